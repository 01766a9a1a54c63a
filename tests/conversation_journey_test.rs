//! Conversation journey integration tests
//!
//! These tests walk a host app through a multi-turn dialogue, persisting
//! the state as JSON between turns the way a session store would.

mod helpers;

use assert_matches::assert_matches;
use helpers::*;
use serde_json::json;
use vui_state::state::{is_child_token, is_flow};
use vui_state::{add_state_to_app, AppContext, ConversationState, Flow, FlowNode, Settings, VuiStateError};

/// Run one dialogue turn against the persisted state and persist it again
fn run_turn<F>(stored: &str, turn: F) -> anyhow::Result<String>
where
    F: FnOnce(&mut ConversationState),
{
    let mut state: ConversationState = stored.parse()?;
    turn(&mut state);
    Ok(state.to_json()?)
}

#[test]
fn test_multi_turn_pizza_order() -> anyhow::Result<()> {
    let settings = Settings::from_toml_str("[state]\nauto_increment_prompts = true")?;
    let mut app = AppContext::new(settings);
    assert!(add_state_to_app(&mut app));
    assert!(!add_state_to_app(&mut app));

    let state = app.new_state().expect("state support was added");
    let mut stored = state.to_json()?;

    // turn 1: start the order and ask for a size
    stored = run_turn(&stored, |state| {
        state.set_current_flow("order pizza");
        state.set_last_prompt("order pizza.size");
    })?;

    // turn 2: user did not answer, ask again
    stored = run_turn(&stored, |state| {
        assert_eq!(state.last_prompt(), Some("ORDER_PIZZA.SIZE"));
        state.set_last_prompt("order pizza.size");
    })?;

    // turn 3: user answered
    stored = run_turn(&stored, |state| {
        assert_eq!(state.get_prompted_count("order pizza.size"), Some(2));
        state.set_answer("order pizza.size", "large").unwrap();
        state.set_last_prompt("order pizza.toppings");
    })?;

    let state = ConversationState::from_json(&stored)?;
    assert_eq!(state.current_flow(), Some("ORDER_PIZZA"));
    assert_eq!(state.get_answer("ORDER_PIZZA.SIZE"), Some(json!("large")));
    assert_eq!(state.get_prompted_count("order pizza.toppings"), Some(1));
    assert!(is_child_token(state.current_flow().unwrap(), state.last_prompt().unwrap()));
    assert!(app.check_state(&state).is_ok());
    Ok(())
}

#[test]
fn test_flow_tree_matches_state_tokens() {
    let state = create_pizza_order_state();
    let flows = Flow::parse(state.last_prompt().unwrap());

    let order = flows.sub_flow(0).unwrap();
    let size = order.sub_flow(0).unwrap();
    assert_eq!(order.name(), state.current_flow().unwrap());
    assert_eq!(size.full_upstream_name(), state.last_prompt().unwrap());
    assert!(is_child_token(&order.full_upstream_name(), &size.full_upstream_name()));
    assert!(is_flow(&size));
}

#[test]
fn test_corrupted_session_is_reported() {
    let stored = create_pizza_order_state().to_json().unwrap();
    let truncated = &stored[..stored.len() / 2];
    assert_matches!(ConversationState::from_json(truncated), Err(VuiStateError::Parse(_)));
}
