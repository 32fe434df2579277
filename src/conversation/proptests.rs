//! Property-based tests for the conversation store
//!
//! Random sequences of submissions, settlements and resets must preserve:
//! - single flight: a submission while one is outstanding changes nothing
//! - append-only transcript outside of reset
//! - exactly one bot turn per accepted submission
//! - the open-interrupt flag agreeing with the transcript

use super::*;
use crate::interrupt::{awaited_interrupt, latest_open_interrupt};
use crate::transport::{ServerReply, TransportError};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Submit(Submission),
    Settle(Result<ServerReply, TransportError>),
    Reset,
}

fn arb_kind() -> impl Strategy<Value = InputKind> {
    prop_oneof![
        Just(InputKind::Type),
        Just(InputKind::Select),
        Just(InputKind::Date),
        Just(InputKind::Confirm),
    ]
}

fn arb_interrupt() -> impl Strategy<Value = Interrupt> {
    (
        "[A-Za-z ?]{1,20}",
        arb_kind(),
        proptest::collection::vec("[A-Za-z]{1,8}", 0..4),
        proptest::option::of(prop_oneof![Just("from_date"), Just("to_date"), Just("budget")]),
    )
        .prop_map(|(question, kind, options, key)| {
            let interrupt = Interrupt::new(question, kind).with_options(options);
            match key {
                Some(key) => interrupt.with_key(key),
                None => interrupt,
            }
        })
}

fn arb_submission() -> impl Strategy<Value = Submission> {
    // Blank strings are included so empty payloads get exercised
    let text = prop_oneof!["[a-z ]{1,12}", Just("  ".to_string())].boxed();
    prop_oneof![
        text.clone().prop_map(Submission::Text),
        text.clone().prop_map(Submission::Answer),
        (text, proptest::option::of("[a-z ]{0,8}"))
            .prop_map(|(file_ref, text)| Submission::Attachment { file_ref, text }),
    ]
}

fn arb_outcome() -> impl Strategy<Value = Result<ServerReply, TransportError>> {
    prop_oneof![
        "[a-z]{1,10}".prop_map(|a| Ok(ServerReply::Answer(a))),
        arb_interrupt().prop_map(|i| Ok(ServerReply::Interrupt(i))),
        "[a-z ]{1,10}".prop_map(|m| Err(TransportError::network(m))),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => arb_submission().prop_map(Op::Submit),
        4 => arb_outcome().prop_map(Op::Settle),
        1 => Just(Op::Reset),
    ]
}

// ============================================================================
// Invariant Checkers
// ============================================================================

fn last_is_fallback(store: &ConversationStore) -> bool {
    store.transcript().last() == Some(&Turn::bot(FALLBACK_TEXT))
}

fn check_interrupt_flag(store: &ConversationStore) -> Result<(), TestCaseError> {
    let derived = latest_open_interrupt(store.transcript(), store.in_flight());

    prop_assert!(
        derived.is_none() || store.has_open_interrupt(),
        "answerable interrupt with flag cleared: {:?}",
        store
    );
    if store.in_flight() {
        // Submitting closes the interrupt until the outcome arrives
        prop_assert!(!store.has_open_interrupt(), "flag set while in flight: {:?}", store);
        prop_assert!(!store.view().has_active_interrupt);
        prop_assert!(!store.awaiting_answer());
    }
    // A failed answer leaves the interrupt awaited behind the fallback turn
    if !last_is_fallback(store) {
        prop_assert_eq!(
            store.has_open_interrupt(),
            derived.is_some(),
            "flag disagrees with transcript: {:?}",
            store
        );
    }
    if let Some((index, _)) = derived {
        prop_assert_eq!(
            awaited_interrupt(store.transcript(), store.has_open_interrupt(), store.in_flight())
                .map(|(i, _)| i),
            Some(index)
        );
    }
    Ok(())
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_store_invariants(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut store = ConversationStore::new();
        // Open state when the outstanding submission was accepted
        let mut open_before_flight = false;

        for op in ops {
            let before = store.transcript().to_vec();
            let was_in_flight = store.in_flight();
            let was_open = store.has_open_interrupt();

            match op {
                Op::Submit(submission) => {
                    let accepted = store.begin(submission).is_some();
                    if was_in_flight {
                        // Single flight
                        prop_assert!(!accepted);
                    }
                    if accepted {
                        prop_assert_eq!(store.transcript().len(), before.len() + 1);
                        prop_assert!(store.in_flight());
                        open_before_flight = was_open;
                    } else {
                        prop_assert_eq!(store.transcript(), before.as_slice());
                        prop_assert_eq!(store.in_flight(), was_in_flight);
                        prop_assert_eq!(store.has_open_interrupt(), was_open);
                    }
                }
                Op::Settle(outcome) => {
                    let failed = outcome.is_err();
                    let settlement = store.settle(outcome);
                    if was_in_flight {
                        // Exactly one response per accepted submission
                        prop_assert_eq!(store.transcript().len(), before.len() + 1);
                        prop_assert_eq!(store.transcript()[before.len()].sender(), Sender::Bot);
                        if failed {
                            prop_assert_eq!(store.has_open_interrupt(), open_before_flight);
                        }
                    } else {
                        prop_assert_eq!(settlement, Settlement::Ignored);
                        prop_assert_eq!(store.transcript(), before.as_slice());
                    }
                    prop_assert!(!store.in_flight());
                }
                Op::Reset => {
                    store.reset();
                    open_before_flight = false;
                    prop_assert!(store.transcript().is_empty());
                    prop_assert!(!store.in_flight());
                    prop_assert!(!store.has_open_interrupt());
                    check_interrupt_flag(&store)?;
                    continue;
                }
            }

            // Append-only
            prop_assert!(store.transcript().starts_with(&before));
            check_interrupt_flag(&store)?;
        }
    }

    #[test]
    fn prop_session_constant_until_reset(ops in proptest::collection::vec(arb_op(), 0..20)) {
        let mut store = ConversationStore::new();
        let mut session = store.session_id().clone();

        for op in ops {
            match op {
                Op::Submit(submission) => {
                    if let Some(request) = store.begin(submission) {
                        prop_assert_eq!(request.session_id.as_str(), session.as_str());
                    }
                }
                Op::Settle(outcome) => {
                    store.settle(outcome);
                }
                Op::Reset => {
                    store.reset();
                    prop_assert_ne!(store.session_id(), &session);
                    session = store.session_id().clone();
                }
            }
            prop_assert_eq!(store.session_id(), &session);
        }
    }

    #[test]
    fn prop_request_carries_exactly_one_content_field(submission in arb_submission()) {
        let mut store = ConversationStore::new();
        if let Some(request) = store.begin(submission.clone()) {
            prop_assert!(!submission.is_answer());
            prop_assert!(request.interrupt_response.is_none());
            match submission {
                Submission::Attachment { file_ref, .. } => {
                    prop_assert_eq!(request.pdf, Some(file_ref));
                }
                _ => {
                    prop_assert!(request.user_query.is_some() && request.pdf.is_none());
                }
            }
        }
    }
}
