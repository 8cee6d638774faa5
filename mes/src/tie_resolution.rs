// Copyright 2024 Andrew Conway.
// This file is part of ConcreteMES.
// ConcreteMES is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteMES is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteMES.  If not, see <https://www.gnu.org/licenses/>.

//! Choosing one winner when several candidates have the same effective vote count.
//!
//! Ties are broken in favour of lower cost, then in favour of more approvers. If that still
//! leaves more than one candidate, a total order over candidates is needed. Identifiers do not
//! necessarily have a meaningful natural order, so which order to use is part of the rules.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Serialize,Deserialize};
use crate::budgeting_problem::{BudgetingProblem, CandidateIndex};
use crate::money::Money;
use crate::validation::InvalidInput;

/// The total order used when cost and number of approvers do not separate tied candidates.
#[derive(Debug,Clone,PartialEq,Eq,Default,Serialize,Deserialize)]
pub enum FinalTieResolution {
    /// Lexicographically smallest candidate name is favoured.
    #[default]
    NameOrder,
    /// Candidate listed earliest is favoured.
    BallotOrder,
    /// Candidates listed earlier in this list are favoured. Must list every candidate exactly once.
    Explicit(Vec<CandidateIndex>),
}

impl FromStr for FinalTieResolution {
    type Err = String;

    /// "NameOrder", "BallotOrder", or a comma separated list of candidate indices, most favoured first.
    /// ```
    /// use mes::tie_resolution::FinalTieResolution;
    /// use mes::budgeting_problem::CandidateIndex;
    /// assert_eq!("BallotOrder".parse::<FinalTieResolution>(),Ok(FinalTieResolution::BallotOrder));
    /// assert_eq!("2,0,1".parse::<FinalTieResolution>(),Ok(FinalTieResolution::Explicit(vec![CandidateIndex(2),CandidateIndex(0),CandidateIndex(1)])));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NameOrder" => Ok(FinalTieResolution::NameOrder),
            "BallotOrder" => Ok(FinalTieResolution::BallotOrder),
            _ => {
                let list : Result<Vec<CandidateIndex>,_> = s.split(',').map(|c|c.trim().parse::<CandidateIndex>()).collect();
                list.map(FinalTieResolution::Explicit).map_err(|_|format!("Expecting NameOrder, BallotOrder or a comma separated list of candidate indices, got {}",s))
            }
        }
    }
}

impl Display for FinalTieResolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FinalTieResolution::NameOrder => f.write_str("NameOrder"),
            FinalTieResolution::BallotOrder => f.write_str("BallotOrder"),
            FinalTieResolution::Explicit(order) => write!(f,"{}",order.iter().map(|c|c.to_string()).collect::<Vec<_>>().join(",")),
        }
    }
}

/// Which stage of the tie resolution process separated out the winner.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum TieResolutionStage {
    /// There was no tie.
    NoTie,
    LowestCost,
    MostApprovers,
    FinalOrder,
}

/// The result of resolving a tie.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub struct TieResolution {
    pub winner : CandidateIndex,
    pub decided_by : TieResolutionStage,
}

/// Resolves ties for a particular problem. Pure; the same tied set always gives the same answer, whatever order it is presented in.
pub struct TieBreaker<'a,M> {
    problem : &'a BudgetingProblem<M>,
    /// rank[c] is the position of candidate c in the final total order, 0 most favoured.
    rank : Vec<usize>,
}

impl <'a,M:Money> TieBreaker<'a,M> {
    pub fn new(problem:&'a BudgetingProblem<M>,final_resolution:&FinalTieResolution) -> Result<Self,InvalidInput> {
        let num_candidates = problem.num_candidates();
        let rank = match final_resolution {
            FinalTieResolution::NameOrder => {
                let mut order : Vec<usize> = (0..num_candidates).collect();
                order.sort_by(|&a,&b|problem.candidates[a].name.cmp(&problem.candidates[b].name));
                invert_permutation(&order)
            }
            FinalTieResolution::BallotOrder => (0..num_candidates).collect(),
            FinalTieResolution::Explicit(order) => {
                let not_a_permutation = InvalidInput::TieOrderNotAPermutation { given: order.len(), num_candidates };
                if order.len()!=num_candidates { return Err(not_a_permutation); }
                let mut seen = vec![false;num_candidates];
                for c in order {
                    if c.0>=num_candidates || seen[c.0] { return Err(not_a_permutation); }
                    seen[c.0]=true;
                }
                invert_permutation(&order.iter().map(|c|c.0).collect::<Vec<_>>())
            }
        };
        Ok(TieBreaker{problem,rank})
    }

    /// Choose exactly one of the tied candidates, which must be non-empty.
    pub fn resolve(&self,tied:&[CandidateIndex]) -> TieResolution {
        assert!(!tied.is_empty(),"Cannot resolve a tie between no candidates");
        if tied.len()==1 { return TieResolution{ winner: tied[0], decided_by: TieResolutionStage::NoTie }; }
        let mut remaining : Vec<CandidateIndex> = tied.to_vec();
        let cheapest = remaining.iter().map(|&c|&self.problem.candidate(c).cost).fold(None,|best:Option<&M>,cost|match best {
            Some(b) if b<=cost => Some(b),
            _ => Some(cost),
        }).cloned();
        if let Some(cheapest) = cheapest { remaining.retain(|&c|self.problem.candidate(c).cost==cheapest); }
        if remaining.len()==1 { return TieResolution{ winner: remaining[0], decided_by: TieResolutionStage::LowestCost }; }
        let most_approvers = remaining.iter().map(|&c|self.problem.candidate(c).approvers.len()).max().unwrap_or(0);
        remaining.retain(|&c|self.problem.candidate(c).approvers.len()==most_approvers);
        if remaining.len()==1 { return TieResolution{ winner: remaining[0], decided_by: TieResolutionStage::MostApprovers }; }
        let winner = remaining.into_iter().min_by_key(|c|self.rank[c.0]).unwrap_or(tied[0]);
        TieResolution{ winner, decided_by: TieResolutionStage::FinalOrder }
    }
}

/// Given a list of elements in order, produce for each element its position in the list.
fn invert_permutation(order:&[usize]) -> Vec<usize> {
    let mut rank = vec![0;order.len()];
    for (position,&element) in order.iter().enumerate() { rank[element]=position; }
    rank
}
