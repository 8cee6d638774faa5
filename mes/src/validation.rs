// Copyright 2024 Andrew Conway.
// This file is part of ConcreteMES.
// ConcreteMES is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteMES is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteMES.  If not, see <https://www.gnu.org/licenses/>.

//! Checks done on a problem before any money is allocated.
//! Everything that could make the algorithm ill defined is rejected here, so the algorithm itself
//! never has to deal with it.

use std::collections::HashSet;
use thiserror::Error;
use crate::budgeting_problem::{BudgetingProblem, CandidateIndex, VoterIndex};
use crate::money::Money;

#[derive(Error,Debug,Clone,PartialEq,Eq)]
pub enum InvalidInput {
    #[error("There are no voters, so the budget cannot be divided into equal shares.")]
    NoVoters,
    #[error("The budget {0} is negative or not finite.")]
    InvalidBudget(String),
    #[error("Candidate #{candidate} has cost {cost} which is negative or not finite.")]
    InvalidCost{candidate:CandidateIndex,cost:String},
    #[error("Candidate #{candidate} is approved by voter #{voter} but there are only {num_voters} voters.")]
    ApproverOutOfRange{candidate:CandidateIndex,voter:VoterIndex,num_voters:usize},
    #[error("Candidate #{candidate} lists voter #{voter} as an approver more than once.")]
    DuplicateApprover{candidate:CandidateIndex,voter:VoterIndex},
    #[error("More than one candidate is called {0}.")]
    DuplicateCandidate(String),
    #[error("More than one voter is called {0}.")]
    DuplicateVoter(String),
    #[error("Candidate {candidate} is approved by unknown voter {voter}.")]
    UnknownVoter{candidate:String,voter:String},
    #[error("The explicit tie resolution order has {given} entries but should mention each of the {num_candidates} candidates exactly once.")]
    TieOrderNotAPermutation{given:usize,num_candidates:usize},
    #[error("No votes were provided.")]
    NoVotes,
    #[error("Voter {voter} proposed funding for {found} issues, expecting {expected}.")]
    RaggedVotes{voter:usize,found:usize,expected:usize},
    #[error("Voter {voter} proposed a total of {found}, but voter 0 proposed {expected}. Every proposal should add up to the total budget.")]
    InconsistentTotals{voter:usize,found:usize,expected:usize},
    #[error("There are {found} minimum funding levels, but {expected} issues.")]
    WrongNumberOfMinima{found:usize,expected:usize},
}

/// Check that the budget is something that can be shared out.
pub fn validate_budget<M:Money>(budget:&M) -> Result<(),InvalidInput> {
    if !budget.is_finite() || budget.is_negative() { Err(InvalidInput::InvalidBudget(budget.to_string())) } else { Ok(()) }
}

impl <M:Money> BudgetingProblem<M> {
    /// Check the caller invariants that the algorithm relies upon.
    /// The budget in the problem is checked too, even if it is later overridden.
    pub fn validate(&self) -> Result<(),InvalidInput> {
        if self.voters.is_empty() { return Err(InvalidInput::NoVoters); }
        validate_budget(&self.budget)?;
        let mut voter_names : HashSet<&str> = HashSet::new();
        for voter in &self.voters {
            if !voter_names.insert(voter.as_str()) { return Err(InvalidInput::DuplicateVoter(voter.clone())); }
        }
        let mut candidate_names : HashSet<&str> = HashSet::new();
        let num_voters = self.num_voters();
        for (index,candidate) in self.candidates.iter().enumerate() {
            let index = CandidateIndex(index);
            if !candidate_names.insert(candidate.name.as_str()) { return Err(InvalidInput::DuplicateCandidate(candidate.name.clone())); }
            if !candidate.cost.is_finite() || candidate.cost.is_negative() { return Err(InvalidInput::InvalidCost { candidate: index, cost: candidate.cost.to_string() }); }
            let mut seen : HashSet<VoterIndex> = HashSet::new();
            for &voter in &candidate.approvers {
                if voter.0>=num_voters { return Err(InvalidInput::ApproverOutOfRange { candidate: index, voter, num_voters }); }
                if !seen.insert(voter) { return Err(InvalidInput::DuplicateApprover { candidate: index, voter }); }
            }
        }
        Ok(())
    }
}
