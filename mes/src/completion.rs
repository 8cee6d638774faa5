// Copyright 2024 Andrew Conway.
// This file is part of ConcreteMES.
// ConcreteMES is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteMES is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteMES.  If not, see <https://www.gnu.org/licenses/>.

//! The fixed budget algorithm typically leaves some money unspent. A completion method
//! pretends there is more money than there really is, and uses the largest pretend budget
//! whose outcome still fits within the real one.
//!
//! The Add1 method raises each voter's share by one unit at a time, rerunning the whole
//! fixed budget algorithm from scratch at each level.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Serialize,Deserialize};
use crate::budgeting_problem::{BudgetingProblem, CandidateIndex};
use crate::fixed_budget::FixedBudgetSelector;
use crate::money::Money;
use crate::tie_resolution::{FinalTieResolution, TieBreaker};
use crate::transcript::{BudgetProbe, MesObserver, ProbeOutcome};
use crate::validation::InvalidInput;

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize)]
pub enum CompletionMethod {
    /// Just use the fixed budget algorithm with the real budget.
    None,
    /// Repeatedly increase each voter's budget by 1 while the result stays within the real budget.
    #[default]
    Add1,
}

impl FromStr for CompletionMethod {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" | "NoCompletion" => Ok(CompletionMethod::None),
            "Add1" => Ok(CompletionMethod::Add1),
            _ => Err("No such completion method supported"),
        }
    }
}

impl Display for CompletionMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CompletionMethod::None => "NoCompletion",
            CompletionMethod::Add1 => "Add1",
        })
    }
}

/// The choices that make up a particular variant of the method.
#[derive(Debug,Clone,PartialEq,Eq,Default,Serialize,Deserialize)]
pub struct MesRules {
    #[serde(default)]
    pub completion : CompletionMethod,
    #[serde(default)]
    pub final_tie_resolution : FinalTieResolution,
}

/// The result of the method with completion.
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct CompletedOutcome<M> {
    /// In the order chosen by the fixed budget algorithm at the accepted level.
    pub winners : Vec<CandidateIndex>,
    /// Never more than the real budget.
    pub total_cost : M,
    /// The pretend total budget that produced the winners.
    pub budget_level : M,
    /// The number of budget levels tried after the first one, including a final rejected one.
    pub probes : usize,
}

/// Run the method of equal shares with the problem's budget, completed as the rules say.
///
/// With Add1, the starting level is the largest multiple of the number of voters not exceeding the
/// budget. While the outcome is not exhaustive, the next multiple is tried; it is accepted if its
/// winners cost no more than the real budget, otherwise the previous outcome stands. It also stops
/// if adding the number of voters does not change the level, as happens with large floating point budgets.
pub fn equal_shares<M:Money>(problem:&BudgetingProblem<M>,rules:&MesRules,observer:&mut impl MesObserver<M>) -> Result<CompletedOutcome<M>,InvalidInput> {
    problem.validate()?;
    let tie_breaker = TieBreaker::new(problem,&rules.final_tie_resolution)?;
    let cap = &problem.budget;
    match rules.completion {
        CompletionMethod::None => {
            let winners = run_at_level(problem,&tie_breaker,cap,observer);
            let total_cost = problem.total_cost(&winners);
            Ok(CompletedOutcome{ winners, total_cost, budget_level: cap.clone(), probes: 0 })
        }
        CompletionMethod::Add1 => {
            let num_voters = M::from_usize(problem.num_voters());
            let mut level = (cap.clone()/num_voters.clone()).floor()*num_voters.clone();
            let mut winners = run_at_level(problem,&tie_breaker,&level,observer);
            let mut total_cost = problem.total_cost(&winners);
            observer.probe(&BudgetProbe{ budget_level: level.clone(), winners: winners.clone(), total_cost: total_cost.clone(), outcome: ProbeOutcome::Initial });
            let mut probes = 0;
            while !problem.is_exhaustive(&winners,cap) {
                let next_level = level.clone()+num_voters.clone();
                if next_level <= level {
                    tracing::warn!(budget_level=%level,"budget level too large to increase further");
                    break;
                }
                let next_winners = run_at_level(problem,&tie_breaker,&next_level,observer);
                let next_cost = problem.total_cost(&next_winners);
                probes+=1;
                let fits = next_cost <= *cap;
                observer.probe(&BudgetProbe{ budget_level: next_level.clone(), winners: next_winners.clone(), total_cost: next_cost.clone(), outcome: if fits { ProbeOutcome::Accepted } else { ProbeOutcome::Rejected } });
                if !fits { break; }
                level = next_level;
                winners = next_winners;
                total_cost = next_cost;
            }
            Ok(CompletedOutcome{ winners, total_cost, budget_level: level, probes })
        }
    }
}

/// A complete, fresh run of the fixed budget algorithm. Nothing is carried over between levels.
fn run_at_level<M:Money>(problem:&BudgetingProblem<M>,tie_breaker:&TieBreaker<M>,level:&M,observer:&mut impl MesObserver<M>) -> Vec<CandidateIndex> {
    FixedBudgetSelector::new(problem,tie_breaker,level.clone()).run(observer)
}
