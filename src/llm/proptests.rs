//! Property-based tests for request construction and wire translation
//!
//! These verify that:
//! - The persona preamble is always first and the new user turn always last
//! - History is replayed in order with roles collapsed to user/assistant
//! - Content survives translation into the `OpenAI` wire format unchanged

use super::openai::translate_request;
use super::types::{ChatRole, CompletionRequest};
use crate::message::{Message, Role};
use proptest::prelude::*;

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Assistant), Just(Role::System)]
}

fn arb_message() -> impl Strategy<Value = Message> {
    (arb_role(), "[a-zA-Z0-9 _.!?,]{1,60}").prop_map(|(role, text)| Message::new(role, text))
}

fn arb_history() -> impl Strategy<Value = Vec<Message>> {
    proptest::collection::vec(arb_message(), 0..12)
}

proptest! {
    #[test]
    fn request_frames_history(
        history in arb_history(),
        persona in "[a-zA-Z ]{1,40}",
        text in "[a-zA-Z0-9 ]{1,40}",
    ) {
        let req = CompletionRequest::build(&persona, &history, &text);

        prop_assert_eq!(req.messages.len(), history.len() + 2);
        prop_assert_eq!(req.messages[0].role, ChatRole::System);
        prop_assert_eq!(&req.messages[0].content, &persona);

        let last = req.messages.last().unwrap();
        prop_assert_eq!(last.role, ChatRole::User);
        prop_assert_eq!(&last.content, &text);

        for (msg, turn) in history.iter().zip(&req.messages[1..]) {
            let expected = if msg.role() == Role::User {
                ChatRole::User
            } else {
                ChatRole::Assistant
            };
            prop_assert_eq!(turn.role, expected);
            prop_assert_eq!(turn.content.as_str(), msg.content());
        }
    }

    #[test]
    fn wire_translation_preserves_turns(
        history in arb_history(),
        text in "[a-zA-Z0-9 ]{1,40}",
    ) {
        let req = CompletionRequest::build("persona", &history, &text);
        let wire = translate_request("model", &req);

        prop_assert_eq!(wire.messages.len(), req.messages.len());
        prop_assert!(!wire.stream);
        for (turn, wire_msg) in req.messages.iter().zip(&wire.messages) {
            prop_assert_eq!(wire_msg.role.as_str(), turn.role.as_str());
            prop_assert_eq!(wire_msg.content.as_deref(), Some(turn.content.as_str()));
        }
    }
}
