mod support;

use std::sync::Arc;

use proptest::prelude::*;
use risk_flow::{Advance, FlowPhase, PredictionCompletion};
use risk_predictor::HeuristicPredictor;
use risk_spec::Language;
use support::{controller, scenario};

#[derive(Debug, Clone)]
enum Op {
    Answer(usize),
    Advance,
    Retreat,
    Language(bool),
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..6).prop_map(Op::Answer),
        Just(Op::Advance),
        Just(Op::Retreat),
        any::<bool>().prop_map(Op::Language),
        Just(Op::Reset),
    ]
}

proptest! {
    #[test]
    fn step_index_stays_in_bounds(ops in proptest::collection::vec(op(), 0..64)) {
        let mut flow = controller(Arc::new(HeuristicPredictor::new()));
        let answers = scenario();
        let total = flow.tables().question_count();

        for op in ops {
            match op {
                Op::Answer(idx) => {
                    let (key, value) = &answers[idx];
                    let _ = flow.record_answer(key, value.clone());
                }
                Op::Advance => {
                    if let Ok(Advance::Submitted(job)) = flow.advance() {
                        prop_assert!(flow.is_pending());
                        let outcome = HeuristicPredictor::classify(job.request());
                        let completion = PredictionCompletion {
                            ticket: job.ticket(),
                            outcome,
                        };
                        prop_assert!(flow.apply_prediction(completion).is_ok());
                        prop_assert!(!flow.is_pending());
                    }
                }
                Op::Retreat => {
                    let _ = flow.retreat();
                }
                Op::Language(arabic) => {
                    let step = flow.step();
                    let before = flow.answers().clone();
                    flow.set_language(if arabic { Language::Ar } else { Language::En });
                    prop_assert_eq!(flow.step(), step);
                    prop_assert_eq!(flow.answers(), &before);
                }
                Op::Reset => {
                    flow.reset();
                    prop_assert_eq!(flow.step(), 0);
                    prop_assert_eq!(flow.phase(), &FlowPhase::Questioning);
                }
            }
            prop_assert!(flow.step() < total);
        }
    }
}
