// Copyright 2024 Andrew Conway.
// This file is part of ConcreteMES.
// ConcreteMES is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteMES is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteMES.  If not, see <https://www.gnu.org/licenses/>.

//! This is the real Method of Equal Shares algorithm, for a fixed total budget.
//!
//! Each voter starts with an equal share of the budget. Each round, every candidate still in
//! contention is assigned an effective vote count: if its approvers split its cost as equally as
//! they can (those who cannot afford an equal share pay everything they have left), the
//! effective vote count is the cost divided by the largest individual payment. The candidate
//! with the highest effective vote count is funded, and its approvers pay.
//! See <https://equalshares.net/implementation/computation>

use std::cmp::Ordering;
use std::collections::BTreeMap;
use crate::budgeting_problem::{BudgetingProblem, CandidateIndex, VoterIndex};
use crate::money::{sum_money, Money};
use crate::tie_resolution::{FinalTieResolution, TieBreaker};
use crate::transcript::{ChosenWinner, MesObserver, SelectionRound};
use crate::validation::{validate_budget, InvalidInput};

/// The result of trying to work out the effective vote count of a candidate.
#[derive(Debug,Clone,PartialEq)]
pub enum EffectiveVoteCount<M> {
    /// The approvers between them have less money than the cost. This will never get better.
    Unaffordable,
    /// The approvers can afford it, with the given effective vote count.
    Count(M),
    /// The approvers have enough money in total, but rounding error in floating point arithmetic
    /// means that no approver could be found who pays a full share. Skip this round.
    RoundingShortfall,
}

/// Compute the effective vote count of a candidate of the given cost, whose approvers have the given
/// remaining budgets. The order of `approver_budgets` does not matter.
///
/// ```
/// use mes::fixed_budget::{effective_vote_count, EffectiveVoteCount};
/// // two poor approvers pay 2 each, the rich one pays the remaining 8. 12/8 = 1.5.
/// assert_eq!(effective_vote_count(&12.0,&[10.0,2.0,2.0]),EffectiveVoteCount::Count(1.5));
/// assert_eq!(effective_vote_count(&12.0,&[1.0,1.0,1.0]),EffectiveVoteCount::Unaffordable);
/// ```
pub fn effective_vote_count<M:Money>(cost:&M,approver_budgets:&[M]) -> EffectiveVoteCount<M> {
    let mut sorted : Vec<&M> = approver_budgets.iter().collect();
    sorted.sort_by(|a,b|a.partial_cmp(b).unwrap_or(Ordering::Equal));
    effective_vote_count_of_sorted(cost,&sorted)
}

/// Like [effective_vote_count] but budgets must already be in increasing order.
fn effective_vote_count_of_sorted<M:Money>(cost:&M,sorted_budgets:&[&M]) -> EffectiveVoteCount<M> {
    let money_behind_now = sum_money(sorted_budgets.iter().copied());
    if money_behind_now < *cost { return EffectiveVoteCount::Unaffordable; }
    let mut paid_so_far = M::zero();
    let mut denominator = sorted_budgets.len();
    for &budget in sorted_budgets {
        let max_payment = (cost.clone()-paid_so_far.clone())/M::from_usize(denominator);
        if *budget < max_payment { // pays everything they have left
            paid_so_far = paid_so_far+budget.clone();
            denominator-=1;
        } else { // this approver and all richer ones pay max_payment.
            return EffectiveVoteCount::Count(cost.clone()/max_payment);
        }
    }
    EffectiveVoteCount::RoundingShortfall
}

/// Run the method of equal shares with a fixed total budget, returning the winners in the order chosen.
///
/// The budget given overrides the budget in the problem. Each voter starts with `budget/number of voters`.
/// The problem is not modified.
pub fn equal_shares_fixed_budget<M:Money>(problem:&BudgetingProblem<M>,budget:&M,final_tie_resolution:&FinalTieResolution,observer:&mut impl MesObserver<M>) -> Result<Vec<CandidateIndex>,InvalidInput> {
    problem.validate()?;
    validate_budget(budget)?;
    let tie_breaker = TieBreaker::new(problem,final_tie_resolution)?;
    Ok(FixedBudgetSelector::new(problem,&tie_breaker,budget.clone()).run(observer))
}

/// The state of one run of the fixed budget algorithm. Created, run once, and discarded.
/// Assumes the problem has already been validated.
pub(crate) struct FixedBudgetSelector<'a,M> {
    problem : &'a BudgetingProblem<M>,
    tie_breaker : &'a TieBreaker<'a,M>,
    budget_level : M,
    /// Money left, by voter.
    budgets : Vec<M>,
    /// Candidates still in contention, with their most recently computed effective vote count.
    /// Effective vote counts never increase, so this is an upper bound on the current value.
    remaining : BTreeMap<CandidateIndex,M>,
    winners : Vec<CandidateIndex>,
}

/// What was found when looking for the best candidate in a round.
struct BestInRound<M> {
    best : Vec<CandidateIndex>,
    best_effective_vote_count : Option<M>,
    unaffordable : Vec<CandidateIndex>,
}

impl <'a,M:Money> FixedBudgetSelector<'a,M> {
    pub(crate) fn new(problem:&'a BudgetingProblem<M>,tie_breaker:&'a TieBreaker<'a,M>,budget_level:M) -> Self {
        let share = budget_level.clone()/M::from_usize(problem.num_voters());
        let budgets = vec![share;problem.num_voters()];
        let remaining = (0..problem.num_candidates()).map(CandidateIndex)
            .filter(|&c|problem.is_eligible(c))
            .map(|c|(c,M::from_usize(problem.candidate(c).approvers.len())))
            .collect();
        FixedBudgetSelector{ problem, tie_breaker, budget_level, budgets, remaining, winners: vec![] }
    }

    pub(crate) fn run(mut self,observer:&mut impl MesObserver<M>) -> Vec<CandidateIndex> {
        for round in 0.. {
            let budgets_at_start = self.budgets.clone();
            let found = self.find_best();
            let chosen = match &found.best_effective_vote_count {
                Some(best_effective_vote_count) => Some(self.elect(&found.best,best_effective_vote_count)),
                None => None,
            };
            let finished = chosen.is_none();
            observer.round(&SelectionRound{
                round,
                budget_level: self.budget_level.clone(),
                budgets: budgets_at_start,
                unaffordable: found.unaffordable,
                best: found.best,
                best_effective_vote_count: found.best_effective_vote_count,
                chosen,
            });
            if finished { break; }
        }
        self.winners
    }

    /// Go through remaining candidates in order of decreasing previous effective vote count,
    /// stopping once the bound shows nothing later can match the best found.
    fn find_best(&mut self) -> BestInRound<M> {
        let mut in_order : Vec<(CandidateIndex,M)> = self.remaining.iter().map(|(c,e)|(*c,e.clone())).collect();
        in_order.sort_by(|(_,a),(_,b)|b.partial_cmp(a).unwrap_or(Ordering::Equal));
        let mut res = BestInRound{ best: vec![], best_effective_vote_count: None, unaffordable: vec![] };
        for (candidate,previous_effective_vote_count) in in_order {
            if let Some(best) = &res.best_effective_vote_count {
                if previous_effective_vote_count < *best { break; }
            }
            match self.current_effective_vote_count(candidate) {
                EffectiveVoteCount::Unaffordable => {
                    self.remaining.remove(&candidate);
                    res.unaffordable.push(candidate);
                }
                EffectiveVoteCount::RoundingShortfall => {}
                EffectiveVoteCount::Count(effective_vote_count) => {
                    match &res.best_effective_vote_count {
                        Some(best) if effective_vote_count < *best => {}
                        Some(best) if effective_vote_count == *best => res.best.push(candidate),
                        _ => {
                            res.best=vec![candidate];
                            res.best_effective_vote_count=Some(effective_vote_count.clone());
                        }
                    }
                    self.remaining.insert(candidate,effective_vote_count);
                }
            }
        }
        res
    }

    fn current_effective_vote_count(&self,candidate:CandidateIndex) -> EffectiveVoteCount<M> {
        // private copy, as the sort must not affect the problem.
        let mut approvers : Vec<VoterIndex> = self.problem.candidate(candidate).approvers.clone();
        approvers.sort_by(|a,b|self.budgets[a.0].partial_cmp(&self.budgets[b.0]).unwrap_or(Ordering::Equal));
        let sorted_budgets : Vec<&M> = approvers.iter().map(|v|&self.budgets[v.0]).collect();
        effective_vote_count_of_sorted(&self.problem.candidate(candidate).cost,&sorted_budgets)
    }

    /// Choose one of the best candidates, and charge its approvers.
    fn elect(&mut self,best:&[CandidateIndex],best_effective_vote_count:&M) -> ChosenWinner<M> {
        let resolution = self.tie_breaker.resolve(best);
        let winner = resolution.winner;
        self.winners.push(winner);
        self.remaining.remove(&winner);
        let payment_per_share = self.problem.candidate(winner).cost.clone()/best_effective_vote_count.clone();
        let mut payments = vec![];
        for &voter in &self.problem.candidate(winner).approvers {
            let budget = &mut self.budgets[voter.0];
            let payment = budget.clone().min_money(payment_per_share.clone());
            *budget = budget.clone()-payment.clone();
            payments.push((voter,payment));
        }
        ChosenWinner{ candidate: winner, decided_by: resolution.decided_by, payment_per_share, payments }
    }
}
