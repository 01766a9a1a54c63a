//! Test data helpers for creating states and operation sequences

#![allow(dead_code)]

use proptest::prelude::*;
use serde_json::{json, Value};
use vui_state::ConversationState;

/// One public mutation of a conversation state
#[derive(Debug, Clone)]
pub enum StateOp {
    SetFlow(String),
    SetPrompt(String),
    SetAnswer(String, Value),
    ClearAnswer(String),
    Increment(String),
    Reset(String),
    EnableAutoIncrement,
    DisableAutoIncrement,
    Clear,
}

impl StateOp {
    pub fn apply(&self, state: &mut ConversationState) {
        match self {
            StateOp::SetFlow(token) => {
                state.set_current_flow(token);
            }
            StateOp::SetPrompt(token) => {
                state.set_last_prompt(token);
            }
            StateOp::SetAnswer(token, value) => {
                state.set_answer_value(token, Some(value.clone()));
            }
            StateOp::ClearAnswer(token) => {
                state.clear_answer(token);
            }
            StateOp::Increment(token) => {
                state.increment_prompted_count(token);
            }
            StateOp::Reset(token) => {
                state.reset_prompted_count(token);
            }
            StateOp::EnableAutoIncrement => state.enable_prompt_count_auto_increment(),
            StateOp::DisableAutoIncrement => state.disable_prompt_count_auto_increment(),
            StateOp::Clear => state.clear(),
        }
    }
}

/// Tokens a voice app might use, including messy spacing and blanks
pub fn token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec![
            "order",
            "order.size",
            " order . size ",
            "order.crust",
            "ask name",
            "ask name . retry",
            "a..b",
            "",
            "   ",
        ])
        .prop_map(str::to_string),
        "[a-c ]{0,4}(\\.[a-c ]{0,4}){0,2}",
    ]
}

/// Tokens that normalize to something
pub fn usable_token_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z ]{0,5}(\\.[a-z ]{0,5}[a-z]){0,2}"
}

fn scalar_answer_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "\\PC{0,12}".prop_map(Value::from),
    ]
}

/// JSON answers without nested objects
pub fn answer_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        scalar_answer_strategy(),
        prop::collection::vec(scalar_answer_strategy(), 0..4).prop_map(Value::from),
    ]
}

pub fn state_op_strategy() -> impl Strategy<Value = StateOp> {
    prop_oneof![
        token_strategy().prop_map(StateOp::SetFlow),
        token_strategy().prop_map(StateOp::SetPrompt),
        (token_strategy(), answer_strategy()).prop_map(|(t, v)| StateOp::SetAnswer(t, v)),
        token_strategy().prop_map(StateOp::ClearAnswer),
        token_strategy().prop_map(StateOp::Increment),
        token_strategy().prop_map(StateOp::Reset),
        Just(StateOp::EnableAutoIncrement),
        Just(StateOp::DisableAutoIncrement),
        Just(StateOp::Clear),
    ]
}

/// A state part way through a pizza order
pub fn create_pizza_order_state() -> ConversationState {
    let mut state = ConversationState::new();
    state.enable_prompt_count_auto_increment();
    state.set_current_flow("order pizza");
    state.set_last_prompt("order pizza . size");
    state.set_answer("order pizza.size", "large").unwrap();
    state.set_answer("order pizza.toppings", json!(["ham", "olives"])).unwrap();
    state
}
