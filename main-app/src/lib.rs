// Copyright 2024 Andrew Conway.
// This file is part of ConcreteMES.
// ConcreteMES is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteMES is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteMES.  If not, see <https://www.gnu.org/licenses/>.

//! This crate provides a unified API to the different variants of the method of equal shares.
//! It also contains the main binaries.

pub mod rules;

/// Set up logging to stderr. `RUST_LOG` takes precedence; otherwise verbose means debug level.
pub fn init_logging(verbose:bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_|default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
