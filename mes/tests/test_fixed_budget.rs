// Copyright 2024 Andrew Conway.
// This file is part of ConcreteMES.
// ConcreteMES is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteMES is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteMES.  If not, see <https://www.gnu.org/licenses/>.

use mes::budgeting_problem::{BudgetingProblem, BudgetingProblemBuilder, CandidateIndex, VoterIndex};
use mes::fixed_budget::{effective_vote_count, equal_shares_fixed_budget, EffectiveVoteCount};
use mes::tie_resolution::{FinalTieResolution, TieBreaker, TieResolution, TieResolutionStage};
use mes::transcript::TranscriptRecorder;
use mes::validation::InvalidInput;
use num::{BigInt, BigRational};

fn scenario_a() -> BudgetingProblem<f64> {
    let mut builder = BudgetingProblemBuilder::default();
    builder.add_voters(["1","2","3"]);
    builder.add_candidate("x",100.0,&["1"]).unwrap();
    builder.add_candidate("y",200.0,&["2"]).unwrap();
    builder.add_candidate("z",300.0,&["3"]).unwrap();
    builder.build(600.0).unwrap()
}

/// p is cheap and approved by a,b,c. u is approved by a,b,d and ties with p in the first round,
/// then in the second round a and b cannot afford an equal share of u.
fn water_filling_problem() -> BudgetingProblem<f64> {
    let mut builder = BudgetingProblemBuilder::default();
    builder.add_voters(["a","b","c","d"]);
    builder.add_candidate("p",9.0,&["a","b","c"]).unwrap();
    builder.add_candidate("u",24.0,&["a","b","d"]).unwrap();
    builder.build(40.0).unwrap()
}

fn rational(n:i64) -> BigRational { BigRational::from_integer(BigInt::from(n)) }

#[test]
fn test_effective_vote_count() {
    assert_eq!(effective_vote_count(&12.0,&[4.0,4.0,4.0]),EffectiveVoteCount::Count(3.0));
    assert_eq!(effective_vote_count(&12.0,&[10.0,2.0,2.0]),EffectiveVoteCount::Count(1.5));
    assert_eq!(effective_vote_count(&12.0,&[2.0,10.0,2.0]),EffectiveVoteCount::Count(1.5));
    assert_eq!(effective_vote_count(&12.0,&[100.0]),EffectiveVoteCount::Count(1.0));
    assert_eq!(effective_vote_count(&12.0,&[5.0,5.0]),EffectiveVoteCount::Unaffordable);
    assert_eq!(effective_vote_count(&12.0,&[]),EffectiveVoteCount::Unaffordable);
    assert_eq!(effective_vote_count(&rational(12),&[rational(6),rational(6)]),EffectiveVoteCount::Count(rational(2)));
}

#[test]
fn test_scenario_a_fixed_budget() {
    let problem = scenario_a();
    let mut recorder = TranscriptRecorder::default();
    let winners = equal_shares_fixed_budget(&problem,&600.0,&FinalTieResolution::NameOrder,&mut recorder).unwrap();
    // z costs 300 but its only approver has 200.
    assert_eq!(problem.names(&winners),vec!["x","y"]);
    let rounds = &recorder.transcript.rounds;
    assert_eq!(rounds.len(),3);
    assert_eq!(rounds[0].unaffordable,vec![CandidateIndex(2)]);
    assert_eq!(rounds[0].best,vec![CandidateIndex(0),CandidateIndex(1)]);
    assert_eq!(rounds[0].budgets,vec![200.0,200.0,200.0]);
    assert_eq!(rounds[0].chosen.as_ref().unwrap().decided_by,TieResolutionStage::LowestCost);
    assert!(rounds[2].chosen.is_none());
    assert_eq!(rounds[2].budgets,vec![100.0,0.0,200.0]);
}

#[test]
fn test_water_filling() {
    let problem = water_filling_problem();
    let mut recorder = TranscriptRecorder::default();
    let winners = equal_shares_fixed_budget(&problem,&40.0,&FinalTieResolution::NameOrder,&mut recorder).unwrap();
    assert_eq!(problem.names(&winners),vec!["p","u"]);
    let rounds = &recorder.transcript.rounds;
    assert_eq!(rounds[0].best_effective_vote_count,Some(3.0));
    assert_eq!(rounds[0].best,vec![CandidateIndex(0),CandidateIndex(1)]);
    assert_eq!(rounds[1].budgets,vec![7.0,7.0,7.0,10.0]);
    assert_eq!(rounds[1].best_effective_vote_count,Some(24.0/10.0));
    let chosen = rounds[1].chosen.as_ref().unwrap();
    assert_eq!(chosen.decided_by,TieResolutionStage::NoTie);
    assert_eq!(chosen.payments,vec![(VoterIndex(0),7.0),(VoterIndex(1),7.0),(VoterIndex(3),10.0)]);
    assert_eq!(rounds[2].budgets,vec![0.0,0.0,7.0,0.0]);
}

#[test]
fn test_water_filling_exact() {
    let problem = water_filling_problem().convert_money(|v|BigRational::from_float(*v)).unwrap();
    let mut recorder = TranscriptRecorder::default();
    let winners = equal_shares_fixed_budget(&problem,&rational(40),&FinalTieResolution::NameOrder,&mut recorder).unwrap();
    assert_eq!(winners,vec![CandidateIndex(0),CandidateIndex(1)]);
    let rounds = &recorder.transcript.rounds;
    assert_eq!(rounds[1].best_effective_vote_count,Some(BigRational::new(BigInt::from(12),BigInt::from(5))));
    assert_eq!(rounds[1].chosen.as_ref().unwrap().payment_per_share,rational(10));
}

#[test]
fn test_tie_lower_cost_first_regardless_of_order_and_names() {
    // identical approver sets, costs 50 and 60, both effective vote count 2.
    for (cheap_name,expensive_name) in [("cheap","expensive"),("zzz","aaa")] {
        for cheap_first in [true,false] {
            let mut builder = BudgetingProblemBuilder::default();
            builder.add_voters(["a","b"]);
            if cheap_first {
                builder.add_candidate(cheap_name,50.0,&["a","b"]).unwrap();
                builder.add_candidate(expensive_name,60.0,&["b","a"]).unwrap();
            } else {
                builder.add_candidate(expensive_name,60.0,&["b","a"]).unwrap();
                builder.add_candidate(cheap_name,50.0,&["a","b"]).unwrap();
            }
            let problem = builder.build(200.0).unwrap();
            for tie in [FinalTieResolution::NameOrder,FinalTieResolution::BallotOrder] {
                let winners = equal_shares_fixed_budget(&problem,&200.0,&tie,&mut ()).unwrap();
                assert_eq!(problem.candidate(winners[0]).name,cheap_name);
                assert_eq!(winners.len(),2);
            }
        }
    }
}

#[test]
fn test_tie_more_approvers_first() {
    let mut builder = BudgetingProblemBuilder::default();
    builder.add_voters(["a","b","c"]);
    builder.add_candidate("aaa",10.0,&["b","c"]).unwrap();
    builder.add_candidate("zzz",10.0,&["a","b","c"]).unwrap();
    let problem = builder.build(30.0).unwrap();
    for tie in [FinalTieResolution::NameOrder,FinalTieResolution::BallotOrder] {
        let tie_breaker = TieBreaker::new(&problem,&tie).unwrap();
        let expected = TieResolution{ winner: CandidateIndex(1), decided_by: TieResolutionStage::MostApprovers };
        assert_eq!(tie_breaker.resolve(&[CandidateIndex(0),CandidateIndex(1)]),expected);
        assert_eq!(tie_breaker.resolve(&[CandidateIndex(1),CandidateIndex(0)]),expected);
        assert_eq!(tie_breaker.resolve(&[CandidateIndex(0)]),TieResolution{ winner: CandidateIndex(0), decided_by: TieResolutionStage::NoTie });
    }
}

/// first uses up all of voter a's money. Then aaa and zzz both have effective vote count 2
/// and cost 10, and zzz wins by having more approvers.
#[test]
fn test_tie_more_approvers_first_in_selection() {
    let mut builder = BudgetingProblemBuilder::default();
    builder.add_voters(["a","b","c","d","e","f"]);
    builder.add_candidate("first",40.0,&["a","d","e","f"]).unwrap();
    builder.add_candidate("aaa",10.0,&["b","c"]).unwrap();
    builder.add_candidate("zzz",10.0,&["a","b","c"]).unwrap();
    let problem = builder.build(60.0).unwrap();
    for tie in [FinalTieResolution::NameOrder,FinalTieResolution::BallotOrder] {
        let mut recorder = TranscriptRecorder::default();
        let winners = equal_shares_fixed_budget(&problem,&60.0,&tie,&mut recorder).unwrap();
        assert_eq!(problem.names(&winners),vec!["first","zzz","aaa"]);
        let rounds = &recorder.transcript.rounds;
        assert_eq!(rounds[1].budgets[0],0.0);
        assert_eq!(rounds[1].best,vec![CandidateIndex(2),CandidateIndex(1)]);
        assert_eq!(rounds[1].best_effective_vote_count,Some(2.0));
        assert_eq!(rounds[1].chosen.as_ref().unwrap().decided_by,TieResolutionStage::MostApprovers);
    }
}

#[test]
fn test_final_tie_resolution() {
    let mut builder = BudgetingProblemBuilder::default();
    builder.add_voters(["a","b"]);
    builder.add_candidate("q",10.0,&["a","b"]).unwrap();
    builder.add_candidate("p",10.0,&["a","b"]).unwrap();
    let problem = builder.build(20.0).unwrap();
    let run = |tie:FinalTieResolution| problem.names(&equal_shares_fixed_budget(&problem,&20.0,&tie,&mut ()).unwrap());
    assert_eq!(run(FinalTieResolution::NameOrder),vec!["p","q"]);
    assert_eq!(run(FinalTieResolution::BallotOrder),vec!["q","p"]);
    assert_eq!(run(FinalTieResolution::Explicit(vec![CandidateIndex(1),CandidateIndex(0)])),vec!["p","q"]);
    assert_eq!(equal_shares_fixed_budget(&problem,&20.0,&FinalTieResolution::Explicit(vec![CandidateIndex(1)]),&mut ()),Err(InvalidInput::TieOrderNotAPermutation { given: 1, num_candidates: 2 }));
    assert!(equal_shares_fixed_budget(&problem,&20.0,&FinalTieResolution::Explicit(vec![CandidateIndex(1),CandidateIndex(1)]),&mut ()).is_err());
}

#[test]
fn test_degenerate_candidates_ignored() {
    let mut builder = BudgetingProblemBuilder::default();
    builder.add_voters(["a","b"]);
    builder.add_candidate("free",0.0,&["a","b"]).unwrap();
    builder.add_candidate("unloved",1.0,&[] as &[&str]).unwrap();
    builder.add_candidate("real",10.0,&["a"]).unwrap();
    let problem = builder.build(100.0).unwrap();
    let winners = equal_shares_fixed_budget(&problem,&100.0,&FinalTieResolution::NameOrder,&mut ()).unwrap();
    assert_eq!(problem.names(&winners),vec!["real"]);
}

#[test]
fn test_zero_budget() {
    let problem = scenario_a();
    assert_eq!(equal_shares_fixed_budget(&problem,&0.0,&FinalTieResolution::NameOrder,&mut ()).unwrap(),vec![]);
}

#[test]
fn test_deterministic_and_problem_unmodified() {
    let problem = water_filling_problem();
    let original = problem.clone();
    let first = equal_shares_fixed_budget(&problem,&40.0,&FinalTieResolution::NameOrder,&mut ()).unwrap();
    let second = equal_shares_fixed_budget(&problem,&40.0,&FinalTieResolution::NameOrder,&mut ()).unwrap();
    assert_eq!(first,second);
    assert_eq!(problem,original);
}

#[test]
fn test_invalid_input() {
    let problem = scenario_a();
    assert_eq!(equal_shares_fixed_budget(&problem,&-1.0,&FinalTieResolution::NameOrder,&mut ()),Err(InvalidInput::InvalidBudget("-1".to_string())));
    assert!(matches!(equal_shares_fixed_budget(&problem,&f64::NAN,&FinalTieResolution::NameOrder,&mut ()),Err(InvalidInput::InvalidBudget(_))));
    assert!(matches!(equal_shares_fixed_budget(&problem,&f64::INFINITY,&FinalTieResolution::NameOrder,&mut ()),Err(InvalidInput::InvalidBudget(_))));

    let no_voters = BudgetingProblem::<f64>{ name: Default::default(), voters: vec![], candidates: vec![], budget: 10.0 };
    assert_eq!(equal_shares_fixed_budget(&no_voters,&10.0,&FinalTieResolution::NameOrder,&mut ()),Err(InvalidInput::NoVoters));

    let mut negative_cost = scenario_a();
    negative_cost.candidates[1].cost = -5.0;
    assert!(matches!(equal_shares_fixed_budget(&negative_cost,&600.0,&FinalTieResolution::NameOrder,&mut ()),Err(InvalidInput::InvalidCost{candidate:CandidateIndex(1),..})));

    let mut duplicate_name = scenario_a();
    duplicate_name.candidates[2].name = "x".to_string();
    assert_eq!(equal_shares_fixed_budget(&duplicate_name,&600.0,&FinalTieResolution::NameOrder,&mut ()),Err(InvalidInput::DuplicateCandidate("x".to_string())));

    let mut out_of_range = scenario_a();
    out_of_range.candidates[0].approvers.push(VoterIndex(7));
    assert!(matches!(equal_shares_fixed_budget(&out_of_range,&600.0,&FinalTieResolution::NameOrder,&mut ()),Err(InvalidInput::ApproverOutOfRange{..})));

    let mut repeated = scenario_a();
    repeated.candidates[0].approvers.push(VoterIndex(0));
    assert_eq!(equal_shares_fixed_budget(&repeated,&600.0,&FinalTieResolution::NameOrder,&mut ()),Err(InvalidInput::DuplicateApprover { candidate: CandidateIndex(0), voter: VoterIndex(0) }));
}

#[test]
fn test_builder_errors() {
    let mut builder = BudgetingProblemBuilder::<f64>::default();
    builder.add_voters(["a","b"]);
    assert_eq!(builder.add_candidate("x",1.0,&["c"]),Err(InvalidInput::UnknownVoter { candidate: "x".to_string(), voter: "c".to_string() }));
    builder.add_voter("a");
    assert_eq!(builder.build(1.0),Err(InvalidInput::DuplicateVoter("a".to_string())));
}
