//! Property-based tests for the state machine
//!
//! Random interleavings of user input and gateway outcomes are driven
//! through `transition`, checking after every step that history is
//! append-only, that replies follow their user turn, and that `last_error`
//! tracks only the latest attempt.

use super::transition::*;
use super::*;
use crate::llm::{ErrorInfo, ErrorKind};
use crate::message::{Message, Role};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Send(String),
    Reply(String),
    Fail(ErrorKind),
}

fn arb_error_kind() -> impl Strategy<Value = ErrorKind> {
    prop_oneof![
        Just(ErrorKind::Timeout),
        Just(ErrorKind::Network),
        Just(ErrorKind::EmptyResponse),
        Just(ErrorKind::Unknown),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => "[a-zA-Z ]{0,12}".prop_map(Step::Send),
        2 => "[a-zA-Z ]{1,12}".prop_map(Step::Reply),
        1 => arb_error_kind().prop_map(Step::Fail),
    ]
}

fn to_event(step: &Step) -> Event {
    match step {
        Step::Send(text) => Event::user_message(text.clone()),
        Step::Reply(text) => Event::CompletionSucceeded {
            message: Message::assistant(text.clone()),
        },
        Step::Fail(kind) => Event::completion_failed(ErrorInfo::new(*kind, "boom")),
    }
}

proptest! {
    #[test]
    fn history_is_append_only(steps in proptest::collection::vec(arb_step(), 0..40)) {
        let context = ConvContext::new(true);
        let mut state = ConversationState::new();

        for step in &steps {
            let before = state.messages().to_vec();
            if let Ok(result) = transition(&state, &context, to_event(step)) {
                state = result.new_state;
            }
            prop_assert!(state.messages().len() >= before.len());
            prop_assert_eq!(&state.messages()[..before.len()], before.as_slice());
        }
    }

    #[test]
    fn settled_history_pairs_turns(steps in proptest::collection::vec(arb_step(), 0..40)) {
        let context = ConvContext::new(true);
        let mut state = ConversationState::new();
        let mut accepted = 0usize;

        for step in &steps {
            let was_idle = !state.pending();
            if let Ok(result) = transition(&state, &context, to_event(step)) {
                if was_idle && matches!(step, Step::Send(_)) {
                    accepted += 1;
                }
                state = result.new_state;
            }
        }

        let expected_len = if state.pending() { accepted * 2 - 1 } else { accepted * 2 };
        prop_assert_eq!(state.messages().len(), expected_len);

        for (i, msg) in state.messages().iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            prop_assert_eq!(msg.role(), expected);
        }
    }

    #[test]
    fn last_error_tracks_latest_attempt(steps in proptest::collection::vec(arb_step(), 0..40)) {
        let context = ConvContext::new(true);
        let mut state = ConversationState::new();

        for step in &steps {
            let Ok(result) = transition(&state, &context, to_event(step)) else {
                continue;
            };
            state = result.new_state;
            match step {
                Step::Send(_) | Step::Reply(_) => {
                    prop_assert!(state.last_error().is_none());
                }
                Step::Fail(kind) => {
                    prop_assert_eq!(state.last_error().map(|e| e.kind), Some(*kind));
                    let has_notify = result
                        .effects
                        .iter()
                        .any(|e| matches!(e, Effect::NotifyError { .. }));
                    prop_assert!(has_notify);
                }
            }
        }
    }

    #[test]
    fn rejected_events_leave_no_trace(steps in proptest::collection::vec(arb_step(), 0..40)) {
        let context = ConvContext::new(true);
        let mut state = ConversationState::new();

        for step in &steps {
            match transition(&state, &context, to_event(step)) {
                Ok(result) => state = result.new_state,
                Err(TransitionError::BlankMessage | TransitionError::Busy) => {
                    prop_assert!(matches!(step, Step::Send(_)));
                }
                Err(TransitionError::InvalidTransition(_)) => {
                    prop_assert!(!state.pending());
                    prop_assert!(!matches!(step, Step::Send(_)));
                }
            }
        }
    }
}
