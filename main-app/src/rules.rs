// Copyright 2024 Andrew Conway.
// This file is part of ConcreteMES.
// ConcreteMES is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteMES is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteMES.  If not, see <https://www.gnu.org/licenses/>.


use std::fmt::{Display, Formatter};
use std::str::FromStr;
use anyhow::anyhow;
use num::BigRational;
use serde::{Serialize,Deserialize};
use mes::budgeting_problem::{BudgetingProblem, CandidateIndex, ProblemName};
use mes::completion::{equal_shares, CompletedOutcome, CompletionMethod, MesRules};
use mes::money::{rational_from_decimal, Money};
use mes::tie_resolution::FinalTieResolution;
use mes::transcript::{TracingObserver, Transcript, TranscriptRecorder};

#[derive(Copy,Clone,Debug,PartialEq,Eq,Serialize,Deserialize)]
pub enum Rules {
    Add1,
    NoCompletion,
}

impl FromStr for Rules {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Add1" => Ok(Rules::Add1),
            "NoCompletion" => Ok(Rules::NoCompletion),
            _ => Err("No such rule supported")
        }
    }
}

impl Display for Rules {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Rules::Add1 => "Add1",
            Rules::NoCompletion => "NoCompletion",
        };
        f.write_str(s)
    }
}

impl Rules {
    pub fn completion(&self) -> CompletionMethod {
        match self {
            Rules::Add1 => CompletionMethod::Add1,
            Rules::NoCompletion => CompletionMethod::None,
        }
    }

    /// Run the method on a problem. If `exact`, costs and budget are first converted to exact rationals,
    /// taking each value as the decimal it prints as, so 0.1 means exactly 1/10.
    pub fn count(&self,problem:&BudgetingProblem<f64>,final_tie_resolution:&FinalTieResolution,exact:bool) -> anyhow::Result<PossibleOutcomes> {
        let rules = MesRules{ completion: self.completion(), final_tie_resolution: final_tie_resolution.clone() };
        if exact {
            let problem = problem.convert_money(|v|rational_from_decimal(*v)).ok_or_else(||anyhow!("Costs and budget must be finite to use exact arithmetic"))?;
            Ok(PossibleOutcomes::Exact(OutcomeWithTranscript::compute(&problem,&rules)?))
        } else {
            Ok(PossibleOutcomes::Float(OutcomeWithTranscript::compute(problem,&rules)?))
        }
    }
}

#[derive(Serialize, Deserialize,Clone,Debug)]
pub struct RulesDetails{
    pub name : String,
    pub description : String,
}

impl RulesDetails {
    pub fn list() -> Vec<RulesDetails> {
        vec![
            RulesDetails{ name: "Add1".to_string(), description: "Method of equal shares, with each voter's budget repeatedly increased by 1 while the outcome still fits within the real budget.".to_string() },
            RulesDetails{ name: "NoCompletion".to_string(), description: "Method of equal shares with just the real budget. Often leaves money unspent.".to_string() },
        ]
    }
}

/// What is saved as a transcript file.
#[derive(Serialize, Deserialize,Clone,Debug)]
pub struct OutcomeWithTranscript<M> {
    pub name : ProblemName,
    pub rules : MesRules,
    pub outcome : CompletedOutcome<M>,
    pub transcript : Transcript<M>,
}

impl <M:Money> OutcomeWithTranscript<M> {
    pub fn compute(problem:&BudgetingProblem<M>,rules:&MesRules) -> anyhow::Result<Self> {
        let mut observer = (TracingObserver::default(),TranscriptRecorder::default());
        let outcome = equal_shares(problem,rules,&mut observer)?;
        Ok(OutcomeWithTranscript{ name: problem.name.clone(), rules: rules.clone(), outcome, transcript: observer.1.transcript })
    }
}

#[derive(Serialize, Deserialize,Clone,Debug)]
#[serde(untagged)]
pub enum PossibleOutcomes {
    Float(OutcomeWithTranscript<f64>),
    Exact(OutcomeWithTranscript<BigRational>),
}

impl PossibleOutcomes {
    pub fn winners(&self) -> &Vec<CandidateIndex> {
        match self {
            PossibleOutcomes::Float(o) => &o.outcome.winners,
            PossibleOutcomes::Exact(o) => &o.outcome.winners,
        }
    }

    /// Total cost and budget level, formatted for humans.
    pub fn summary(&self) -> String {
        match self {
            PossibleOutcomes::Float(o) => format!("total cost {} at budget level {}",o.outcome.total_cost,o.outcome.budget_level),
            PossibleOutcomes::Exact(o) => format!("total cost {} at budget level {}",o.outcome.total_cost,o.outcome.budget_level),
        }
    }
}
