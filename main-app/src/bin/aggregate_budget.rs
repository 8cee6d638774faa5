// Copyright 2024 Andrew Conway.
// This file is part of ConcreteMES.
// ConcreteMES is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteMES is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteMES.  If not, see <https://www.gnu.org/licenses/>.


use clap::Parser;
use std::path::PathBuf;
use std::fs::File;
use aggregation::budget_aggregation_observed;
use mes::transcript::TracingObserver;

#[derive(Parser)]
#[command(version = "0.2", author = "Andrew Conway")]
/// Combine voters' proposed divisions of a budget between issues into a single division.
struct Opts {
    /// A JSON file containing an array, one entry per voter, of arrays of proposed funding for each issue.
    /// Every voter's proposals must add up to the same total.
    votes : PathBuf,

    /// The minimum funding for each issue, as a comma separated list. Defaults to no minimum.
    #[arg(short, long, value_delimiter = ',')]
    minima : Vec<usize>,

    /// Log the progress of the computation to stderr.
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let opt : Opts = Opts::parse();
    main_app::init_logging(opt.verbose);

    let votes : Vec<Vec<usize>> = serde_json::from_reader(File::open(&opt.votes)?)?;
    let minima = if opt.minima.is_empty() { vec![0;votes.first().map(|v|v.len()).unwrap_or(0)] } else { opt.minima };
    let result = budget_aggregation_observed(&votes,&minima,&mut TracingObserver::default())?;
    for (issue,funding) in result.per_issue.iter().enumerate() {
        println!("{}\t{}",issue,funding);
    }
    Ok(())
}
