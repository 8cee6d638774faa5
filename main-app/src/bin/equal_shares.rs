// Copyright 2024 Andrew Conway.
// This file is part of ConcreteMES.
// ConcreteMES is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteMES is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteMES.  If not, see <https://www.gnu.org/licenses/>.


use clap::Parser;
use std::path::PathBuf;
use std::fs::File;
use mes::budgeting_problem::BudgetingProblem;
use mes::tie_resolution::FinalTieResolution;
use main_app::rules::Rules;

#[derive(Parser)]
#[command(version = "0.2", author = "Andrew Conway", name="ConcreteMES")]
/// Choose projects for participatory budgeting using the method of equal shares.
struct Opts {
    /// The name of the .mes file describing voters, projects and the budget.
    votes : PathBuf,

    /// The completion method to use. Currently supported Add1, NoCompletion
    #[arg(short, long, default_value = "Add1")]
    rules : Rules,

    /// How to resolve ties between projects with the same cost and number of approvers.
    ///
    /// NameOrder (default) favours the project whose name sorts first, BallotOrder the one listed first
    /// in the .mes file. Alternatively a comma separated list of every project index (starting counting at 0),
    /// most favoured first, e.g. `--tie 2,0,1`.
    #[arg(long, default_value = "NameOrder")]
    tie : FinalTieResolution,

    /// Use exact rational arithmetic instead of floating point.
    /// Costs and the budget are taken to be exactly the decimal numbers written in the .mes file.
    #[arg(long)]
    exact : bool,

    /// The total budget. If used, overrides the value in the .mes file.
    #[arg(short, long)]
    budget : Option<f64>,

    /// An optional .transcript file to store every round and budget level tried.
    #[arg(short, long)]
    transcript : Option<PathBuf>,

    /// Log the progress of the computation to stderr.
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let opt : Opts = Opts::parse();
    main_app::init_logging(opt.verbose);

    let mut problem : BudgetingProblem<f64> = BudgetingProblem::load(&opt.votes)?;
    if let Some(budget) = opt.budget { problem.budget=budget; }
    tracing::info!(problem=%problem.name.human_readable_name(),voters=problem.num_voters(),candidates=problem.num_candidates(),budget=problem.budget,rules=%opt.rules,"loaded problem");

    let outcome = opt.rules.count(&problem,&opt.tie,opt.exact)?;

    for &winner in outcome.winners() {
        let candidate = problem.candidate(winner);
        println!("{}\t{}",candidate.name,candidate.cost);
    }
    println!("{}",outcome.summary());

    if let Some(transcript_file) = &opt.transcript {
        if let Some(parent) = transcript_file.parent() { std::fs::create_dir_all(parent)? }
        serde_json::to_writer(File::create(transcript_file)?,&outcome)?;
    }

    Ok(())
}
