//! Integration test: a full turn through the public pieces, no network.
//!
//! Loads file context from a temp directory, walks it through the
//! conversation state machine, and checks the cost numbers an operator
//! would see.

use std::fs;

use tempfile::TempDir;

use gpt_dir_cli::context;
use gpt_dir_cli::tokens::{CostEstimator, PricingTable};
use gpt_dir_core::state::{ChatAction, ChatEvent};
use gpt_dir_core::types::Role;
use gpt_dir_core::StateMachine;

#[test]
fn test_context_seeded_session_runs_one_full_turn() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.py"), "print('hello')\n").unwrap();
    fs::create_dir(dir.path().join(".hidden")).unwrap();
    fs::write(dir.path().join(".hidden/b.py"), "ignored\n").unwrap();

    let context = context::load(dir.path(), &["py".to_string()]).unwrap();
    assert_eq!(context.matches("File: ").count(), 1);
    assert!(context.contains("print('hello')"));

    let mut machine = StateMachine::new("You are a helpful assistant!");

    // Context goes straight to cost confirmation, no interactive turn first
    let action = machine.handle_event(ChatEvent::ContextLoaded(context.clone()));
    let conversation = match action {
        ChatAction::EstimateCost { conversation } => conversation,
        other => panic!("expected EstimateCost, got {:?}", other),
    };
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation[1].role, Role::User);
    assert_eq!(conversation[1].content, context);

    // A tiny context sits far below both confirmation thresholds
    let pricing = PricingTable::builtin().get("3.5-turbo-1106").unwrap();
    let estimator = CostEstimator::new(pricing).unwrap();
    let serialized = serde_json::to_string(&conversation).unwrap();
    let estimate = estimator.input_estimate(&serialized);
    assert!(estimate.tokens > 0);
    assert!(estimate.cost < 0.05);

    // Accept, stream a reply, and land back at the prompt
    let action = machine.handle_event(ChatEvent::CostAccepted);
    assert!(matches!(action, ChatAction::SendRequest { .. }));

    machine.handle_event(ChatEvent::Fragment("It prints".to_string()));
    machine.handle_event(ChatEvent::Fragment(" hello.".to_string()));
    let action = machine.handle_event(ChatEvent::StreamCompleted);

    let (conversation, reply) = match action {
        ChatAction::ReportUsage { conversation, reply } => (conversation, reply),
        other => panic!("expected ReportUsage, got {:?}", other),
    };
    assert_eq!(reply, "It prints hello.");
    assert_eq!(conversation.len(), 3);
    assert_eq!(conversation[2].role, Role::Assistant);

    // The reported total is input over the whole conversation plus output
    // over just the reply
    let input = estimator.input_estimate(&serde_json::to_string(&conversation).unwrap());
    let output = estimator.output_estimate(&reply);
    assert!(input.cost > 0.0);
    assert!(output.cost > 0.0);
    assert!(output.tokens < input.tokens);

    assert_eq!(machine.state().name(), "AwaitingUserInput");
}

#[test]
fn test_unknown_model_fails_before_any_remote_call() {
    let result = PricingTable::builtin().get("does-not-exist");
    assert!(result.is_err());
}
