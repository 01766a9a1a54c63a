//! State management module
//!
//! This module handles conversation state, token normalization and the
//! flow tree, plus the hook that installs state support onto a host app.

pub mod container;
pub mod context;
pub mod flow;
pub mod token;
pub mod tree;

// Re-export commonly used state components
pub use container::{ConversationState, StateSummary};
pub use context::{add_state_to_app, AppContext, SessionCapable, StateConstructor, StateHost};
pub use flow::{is_flow, Flow, FlowNode};
pub use token::{is_child_token, is_child_token_with, normalize};
pub use tree::{PathError, StateNode, StateTree};
