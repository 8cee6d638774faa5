// Copyright 2024 Andrew Conway.
// This file is part of ConcreteMES.
// ConcreteMES is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteMES is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteMES.  If not, see <https://www.gnu.org/licenses/>.


//! Budget aggregation using the method of equal shares.
//!
//! Each voter proposes how a fixed total should be divided between several issues. Each unit of
//! funding for an issue is turned into a synthetic candidate costing 1 (the first funded level of
//! an issue costs the minimum funding for that issue), approved by every voter who proposed at
//! least that much for the issue. The method of equal shares then picks candidates, and each issue
//! gets the highest level picked for it.

use serde::{Serialize,Deserialize};
use mes::budgeting_problem::{BudgetingProblem, Candidate, CandidateIndex, ProblemName, VoterIndex};
use mes::fixed_budget::equal_shares_fixed_budget;
use mes::tie_resolution::FinalTieResolution;
use mes::transcript::MesObserver;
use mes::validation::InvalidInput;

/// What a synthetic candidate represents.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub struct FundingLevel {
    pub issue : usize,
    pub level : usize,
}

/// The result of aggregation.
#[derive(Debug,Clone,PartialEq,Eq,Serialize,Deserialize)]
pub struct AggregatedBudget {
    /// The funding for each issue.
    pub per_issue : Vec<usize>,
    /// The synthetic candidates chosen, in the order chosen.
    pub winners : Vec<String>,
}

/// A budgeting problem whose candidates are funding levels, along with what each candidate represents.
pub struct FundingLevelProblem {
    pub problem : BudgetingProblem<f64>,
    pub levels : Vec<FundingLevel>,
}

impl FundingLevelProblem {
    /// `votes[i][j]` is voter i's proposed funding for issue j. Each voter's proposals must add up to the same total.
    /// `minima[j]` is the minimum funding for issue j; 0 is treated as 1.
    pub fn new(votes:&[Vec<usize>],minima:&[usize]) -> Result<Self,InvalidInput> {
        let num_issues = votes.first().ok_or(InvalidInput::NoVotes)?.len();
        let total_budget : usize = votes[0].iter().sum();
        for (voter,vote) in votes.iter().enumerate() {
            if vote.len()!=num_issues { return Err(InvalidInput::RaggedVotes { voter, found: vote.len(), expected: num_issues }); }
            let total : usize = vote.iter().sum();
            if total!=total_budget { return Err(InvalidInput::InconsistentTotals { voter, found: total, expected: total_budget }); }
        }
        if minima.len()!=num_issues { return Err(InvalidInput::WrongNumberOfMinima { found: minima.len(), expected: num_issues }); }
        let width = total_budget.to_string().len();
        let mut candidates = vec![];
        let mut levels = vec![];
        for (issue,&minimum) in minima.iter().enumerate() {
            let minimum = minimum.max(1);
            for level in minimum..=total_budget {
                let approvers = votes.iter().enumerate().filter(|(_,vote)|vote[issue]>=level).map(|(voter,_)|VoterIndex(voter)).collect();
                candidates.push(Candidate{
                    name: format!("{}-{:0width$}",issue,level,width=width),
                    cost: if level==minimum { minimum as f64 } else { 1.0 },
                    approvers,
                });
                levels.push(FundingLevel{issue,level});
            }
        }
        let problem = BudgetingProblem{
            name: ProblemName{ name: "Budget aggregation".to_string(), ..Default::default() },
            voters: (0..votes.len()).map(|v|v.to_string()).collect(),
            candidates,
            budget: total_budget as f64,
        };
        Ok(FundingLevelProblem{problem,levels})
    }

    /// For each issue, the highest level among the winners, or 0 if none.
    pub fn decode(&self,winners:&[CandidateIndex],num_issues:usize) -> Vec<usize> {
        let mut per_issue = vec![0;num_issues];
        for &w in winners {
            let FundingLevel{issue,level} = self.levels[w.0];
            per_issue[issue]=per_issue[issue].max(level);
        }
        per_issue
    }
}

/// Aggregate the proposals, using the full total budget with no completion.
pub fn budget_aggregation(votes:&[Vec<usize>],minima:&[usize]) -> Result<AggregatedBudget,InvalidInput> {
    budget_aggregation_observed(votes,minima,&mut ())
}

/// Like [budget_aggregation], but report each round of the underlying method to an observer.
pub fn budget_aggregation_observed(votes:&[Vec<usize>],minima:&[usize],observer:&mut impl MesObserver<f64>) -> Result<AggregatedBudget,InvalidInput> {
    let levels = FundingLevelProblem::new(votes,minima)?;
    let winners = equal_shares_fixed_budget(&levels.problem,&levels.problem.budget,&FinalTieResolution::NameOrder,observer)?;
    let per_issue = levels.decode(&winners,minima.len());
    tracing::debug!(?per_issue,"aggregated budget");
    Ok(AggregatedBudget{ per_issue, winners: levels.problem.names(&winners) })
}
