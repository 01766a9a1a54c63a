//! vui-state
//!
//! Conversation state tracking for voice assistant apps. A
//! [`ConversationState`] records the flow a session is in, the last prompt
//! presented, the answers gathered from the user and how often each prompt
//! was presented, all addressed by dotted tokens such as `ORDER.SIZE`.
//! [`Flow`] models nested conversation flows.

pub mod config;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{VuiStateError, Result};

// Re-export main components for easy access
pub use state::{add_state_to_app, AppContext, ConversationState, Flow, FlowNode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
