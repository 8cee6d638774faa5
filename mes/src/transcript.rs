// Copyright 2024 Andrew Conway.
// This file is part of ConcreteMES.
// ConcreteMES is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteMES is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteMES.  If not, see <https://www.gnu.org/licenses/>.

//! Observing what happens in each round of the count, and each budget level tried.
//! Nothing here affects the outcome.

use serde::{Serialize,Deserialize};
use crate::budgeting_problem::{CandidateIndex, VoterIndex};
use crate::money::Money;
use crate::tie_resolution::TieResolutionStage;

/// The candidate chosen in a round, and what it cost its approvers.
#[derive(Clone,Debug,Serialize,Deserialize)]
pub struct ChosenWinner<M> {
    pub candidate : CandidateIndex,
    pub decided_by : TieResolutionStage,
    /// cost/effective vote count. Each approver pays this, or everything they have left if less.
    pub payment_per_share : M,
    pub payments : Vec<(VoterIndex,M)>,
}

/// What happened in one round of the fixed budget selection.
#[derive(Clone,Debug,Serialize,Deserialize)]
pub struct SelectionRound<M> {
    /// 0 for the first round at a given budget level.
    pub round : usize,
    /// The total budget being shared out in this run.
    pub budget_level : M,
    /// Remaining money per voter at the start of the round.
    pub budgets : Vec<M>,
    /// Candidates found to be unaffordable this round, and dropped from consideration.
    pub unaffordable : Vec<CandidateIndex>,
    /// The candidates sharing the best effective vote count.
    pub best : Vec<CandidateIndex>,
    pub best_effective_vote_count : Option<M>,
    /// None if nothing was affordable, which ends the run.
    pub chosen : Option<ChosenWinner<M>>,
}

/// How a budget level tried by the completion method turned out.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize,Deserialize)]
pub enum ProbeOutcome {
    /// The starting level, always used.
    Initial,
    /// The total cost fitted within the real budget, so this level is used.
    Accepted,
    /// The total cost exceeded the real budget, so the previous level stands.
    Rejected,
}

#[derive(Clone,Debug,Serialize,Deserialize)]
pub struct BudgetProbe<M> {
    pub budget_level : M,
    pub winners : Vec<CandidateIndex>,
    pub total_cost : M,
    pub outcome : ProbeOutcome,
}

/// Gets told what is going on. Default methods do nothing.
pub trait MesObserver<M> {
    fn round(&mut self,_round:&SelectionRound<M>) {}
    fn probe(&mut self,_probe:&BudgetProbe<M>) {}
}

/// Observer that ignores everything.
impl <M> MesObserver<M> for () {}

/// Full history of a computation, suitable for saving as JSON.
#[derive(Clone,Debug,Serialize,Deserialize)]
#[serde(bound(deserialize = "M: Deserialize<'de>"))]
pub struct Transcript<M> {
    pub rounds : Vec<SelectionRound<M>>,
    #[serde(skip_serializing_if = "Vec::is_empty",default)]
    pub probes : Vec<BudgetProbe<M>>,
}

impl <M> Default for Transcript<M> {
    fn default() -> Self { Transcript{ rounds: vec![], probes: vec![] } }
}

impl <M> Transcript<M> {
    /// The rounds done at a particular budget level.
    pub fn rounds_at_level<'a>(&'a self,budget_level:&'a M) -> impl Iterator<Item=&'a SelectionRound<M>>+'a where M:PartialEq {
        self.rounds.iter().filter(move |r|r.budget_level==*budget_level)
    }
}

/// Records everything into a [Transcript].
pub struct TranscriptRecorder<M> {
    pub transcript : Transcript<M>,
}

impl <M> Default for TranscriptRecorder<M> {
    fn default() -> Self { TranscriptRecorder{ transcript: Transcript::default() } }
}

impl <M:Clone> MesObserver<M> for TranscriptRecorder<M> {
    fn round(&mut self, round: &SelectionRound<M>) { self.transcript.rounds.push(round.clone()); }
    fn probe(&mut self, probe: &BudgetProbe<M>) { self.transcript.probes.push(probe.clone()); }
}

/// Logs progress via `tracing`. Rounds at debug level, budget levels at info level.
#[derive(Default)]
pub struct TracingObserver {}

impl <M:Money> MesObserver<M> for TracingObserver {
    fn round(&mut self, round: &SelectionRound<M>) {
        match &round.chosen {
            Some(chosen) => tracing::debug!(budget_level=%round.budget_level,round=round.round,best=?round.best,effective_vote_count=?round.best_effective_vote_count,winner=%chosen.candidate,decided_by=?chosen.decided_by,"chose candidate"),
            None => tracing::debug!(budget_level=%round.budget_level,round=round.round,unaffordable=?round.unaffordable,"no affordable candidates remain"),
        }
        tracing::trace!(budgets=?round.budgets,"budgets at start of round");
    }
    fn probe(&mut self, probe: &BudgetProbe<M>) {
        tracing::info!(budget_level=%probe.budget_level,total_cost=%probe.total_cost,outcome=?probe.outcome,winners=?probe.winners,"budget level tried");
    }
}

/// Pass everything on to two observers.
impl <M,A:MesObserver<M>,B:MesObserver<M>> MesObserver<M> for (A,B) {
    fn round(&mut self, round: &SelectionRound<M>) { self.0.round(round); self.1.round(round); }
    fn probe(&mut self, probe: &BudgetProbe<M>) { self.0.probe(probe); self.1.probe(probe); }
}
