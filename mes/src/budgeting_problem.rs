// Copyright 2024 Andrew Conway.
// This file is part of ConcreteMES.
// ConcreteMES is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteMES is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteMES.  If not, see <https://www.gnu.org/licenses/>.

//! Information about the participatory budgeting contest: voters, candidate projects, their costs, and who approves of what.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::num::ParseIntError;
use std::path::Path;
use std::str::FromStr;
use serde::{Serialize,Deserialize};
use serde::de::DeserializeOwned;
use crate::money::{sum_money, Money};
use crate::validation::InvalidInput;

/// a voter, referred to by position in the list of voters, 0 being first
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct VoterIndex(pub usize);
// type alias really, don't want long display
impl fmt::Display for VoterIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
// type alias really, don't want long display
impl fmt::Debug for VoterIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.0) }
}

/// a candidate project, referred to by position in the list of candidates, 0 being first
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CandidateIndex(pub usize);
// type alias really, don't want long display
impl fmt::Display for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
// type alias really, don't want long display
impl fmt::Debug for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.0) }
}

impl FromStr for CandidateIndex {
    type Err = ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(CandidateIndex(s.parse()?)) }
}

/// A candidate project.
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Candidate<M> {
    /// The identifier of the project. Must be unique in a contest.
    pub name : String,
    pub cost : M,
    /// The voters who approve of this project. Order is not meaningful.
    pub approvers : Vec<VoterIndex>,
}

/// Which contest it was. Purely descriptive.
#[derive(Debug,Clone,PartialEq,Eq,Default,Serialize,Deserialize)]
pub struct ProblemName {
    #[serde(default)]
    pub year : String,
    /// The organisation running the process, e.g. a city council
    #[serde(default)]
    pub authority : String,
    #[serde(default)]
    pub name : String,
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub comment : Option<String>,
}

impl ProblemName {
    pub fn human_readable_name(&self) -> String {
        format!("{} {} {}",self.year,self.authority,self.name).trim().to_string()
    }
}

/// A complete set of approval ballots and the money available. Usually stored as a .mes file, which is JSON.
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct BudgetingProblem<M> {
    #[serde(default)]
    pub name : ProblemName,
    /// The identifiers of the voters.
    pub voters : Vec<String>,
    pub candidates : Vec<Candidate<M>>,
    /// The total amount of money that may be spent.
    pub budget : M,
}

impl <M:Money> BudgetingProblem<M> {
    pub fn num_voters(&self) -> usize { self.voters.len() }
    pub fn num_candidates(&self) -> usize { self.candidates.len() }
    pub fn candidate(&self,index:CandidateIndex) -> &Candidate<M> { &self.candidates[index.0] }
    pub fn find_candidate_by_name(&self,name:&str) -> Option<CandidateIndex> {
        self.candidates.iter().position(|c|c.name==name).map(CandidateIndex)
    }

    /// A candidate with no cost or no approvers never takes part in the allocation.
    pub fn is_eligible(&self,index:CandidateIndex) -> bool {
        let candidate = self.candidate(index);
        candidate.cost>M::zero() && !candidate.approvers.is_empty()
    }

    /// Total cost of a set of candidates, summed in the order given.
    pub fn total_cost(&self,chosen:&[CandidateIndex]) -> M {
        sum_money(chosen.iter().map(|&c|&self.candidate(c).cost))
    }

    /// An outcome is exhaustive if no other eligible candidate could be added without exceeding the cap.
    pub fn is_exhaustive(&self,chosen:&[CandidateIndex],cap:&M) -> bool {
        let slack = cap.clone()-self.total_cost(chosen);
        (0..self.num_candidates()).map(CandidateIndex)
            .filter(|c|!chosen.contains(c) && self.is_eligible(*c))
            .all(|c|self.candidate(c).cost>slack)
    }

    /// The names of the given candidates.
    pub fn names(&self,chosen:&[CandidateIndex]) -> Vec<String> {
        chosen.iter().map(|&c|self.candidate(c).name.clone()).collect()
    }

    /// Convert to a different type of money, e.g. floating point to exact. Returns None if some amount could not be converted.
    pub fn convert_money<N>(&self,convert:impl Fn(&M)->Option<N>) -> Option<BudgetingProblem<N>> {
        let mut candidates = Vec::with_capacity(self.candidates.len());
        for c in &self.candidates {
            candidates.push(Candidate{ name: c.name.clone(), cost: convert(&c.cost)?, approvers: c.approvers.clone() });
        }
        Some(BudgetingProblem{ name: self.name.clone(), voters: self.voters.clone(), candidates, budget: convert(&self.budget)? })
    }
}

impl <M:Money+Serialize> BudgetingProblem<M> {
    pub fn save<P:AsRef<Path>>(&self,path:P) -> anyhow::Result<()> {
        if let Some(parent) = path.as_ref().parent() { std::fs::create_dir_all(parent)?; }
        let file = File::create(path)?;
        serde_json::to_writer(file,&self)?;
        Ok(())
    }
}

impl <M:Money+DeserializeOwned> BudgetingProblem<M> {
    /// Read a .mes file and check that it makes sense.
    pub fn load<P:AsRef<Path>>(path:P) -> anyhow::Result<Self> {
        let file = File::open(path)?;
        let problem : BudgetingProblem<M> = serde_json::from_reader(std::io::BufReader::new(file))?;
        problem.validate()?;
        Ok(problem)
    }
}

/// Build a problem from arbitrary voter and candidate identifiers.
///
/// ```
/// use mes::budgeting_problem::BudgetingProblemBuilder;
/// let mut builder = BudgetingProblemBuilder::<f64>::default();
/// builder.add_voters(["alice","bob"]);
/// builder.add_candidate("park",100.0,&["alice","bob"]).unwrap();
/// let problem = builder.build(200.0).unwrap();
/// assert_eq!(problem.candidates[0].approvers.len(),2);
/// ```
pub struct BudgetingProblemBuilder<M> {
    name : ProblemName,
    voters : Vec<String>,
    voter_lookup : HashMap<String,usize>,
    candidates : Vec<Candidate<M>>,
    duplicate_voter : Option<String>,
}

impl <M> Default for BudgetingProblemBuilder<M> {
    fn default() -> Self {
        BudgetingProblemBuilder{ name: ProblemName::default(), voters: vec![], voter_lookup: HashMap::new(), candidates: vec![], duplicate_voter: None }
    }
}

impl <M:Money> BudgetingProblemBuilder<M> {
    pub fn set_name(&mut self,name:ProblemName) { self.name=name; }
    pub fn add_voter(&mut self,voter:impl ToString) -> VoterIndex {
        let voter = voter.to_string();
        if let Some(&existing) = self.voter_lookup.get(&voter) {
            if self.duplicate_voter.is_none() { self.duplicate_voter=Some(voter); }
            return VoterIndex(existing);
        }
        self.voter_lookup.insert(voter.clone(),self.voters.len());
        self.voters.push(voter);
        VoterIndex(self.voters.len()-1)
    }
    pub fn add_voters<S:ToString>(&mut self,voters:impl IntoIterator<Item=S>) {
        for v in voters { self.add_voter(v); }
    }
    /// Add a candidate approved by the named voters, who must have been added already.
    pub fn add_candidate<S:AsRef<str>>(&mut self,name:impl ToString,cost:M,approvers:&[S]) -> Result<CandidateIndex,InvalidInput> {
        let name = name.to_string();
        let mut resolved = Vec::with_capacity(approvers.len());
        for voter in approvers {
            let voter = voter.as_ref();
            match self.voter_lookup.get(voter) {
                Some(&v) => resolved.push(VoterIndex(v)),
                None => return Err(InvalidInput::UnknownVoter { candidate: name, voter: voter.to_string() }),
            }
        }
        self.candidates.push(Candidate{ name, cost, approvers: resolved });
        Ok(CandidateIndex(self.candidates.len()-1))
    }
    /// Produce the problem, validated.
    pub fn build(self,budget:M) -> Result<BudgetingProblem<M>,InvalidInput> {
        if let Some(voter) = self.duplicate_voter { return Err(InvalidInput::DuplicateVoter(voter)); }
        let problem = BudgetingProblem{ name: self.name, voters: self.voters, candidates: self.candidates, budget };
        problem.validate()?;
        Ok(problem)
    }
}
