//! Host app integration
//!
//! A voice app framework hands its handlers a mutable "app" object. This
//! module installs conversation state support onto such an object. Session
//! support is a separate capability owned by the host framework and must be
//! in place first.

use tracing::{debug, info, warn};

use crate::config::{Settings, StateConfig};
use crate::utils::errors::Result;
use super::container::ConversationState;

/// Builds a fresh state from the configured defaults
pub type StateConstructor = fn(&StateConfig) -> ConversationState;

/// Session support provided by the host framework
pub trait SessionCapable {
    /// Install session support; calling it again must be harmless
    fn add_session_capability(&mut self);
}

/// An app object that can carry conversation state support
pub trait StateHost: SessionCapable {
    fn state_already_added(&self) -> bool;

    fn mark_state_added(&mut self);

    fn set_state_constructor(&mut self, constructor: StateConstructor);
}

/// Add conversation state support to `app`.
///
/// Session support is installed first. Returns `false` when state support
/// was already present, in which case nothing changes.
pub fn add_state_to_app<A: StateHost + ?Sized>(app: &mut A) -> bool {
    app.add_session_capability();
    if app.state_already_added() {
        debug!("State support already present on app");
        return false;
    }
    app.mark_state_added();
    app.set_state_constructor(ConversationState::with_config);
    info!("State support added to app");
    true
}

/// Application context holding settings and the installed capabilities
#[derive(Clone, Default)]
pub struct AppContext {
    pub settings: Settings,
    session_capability: bool,
    state_already_added: bool,
    state_constructor: Option<StateConstructor>,
}

impl AppContext {
    /// Create a new AppContext from settings
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Create from `vui_state` config file and environment, validated
    pub fn from_environment() -> Result<Self> {
        let settings = Settings::new()?;
        settings.validate()?;
        Ok(Self::new(settings))
    }

    pub fn has_session_capability(&self) -> bool {
        self.session_capability
    }

    /// Build a new state, or `None` until state support is added
    pub fn new_state(&self) -> Option<ConversationState> {
        self.state_constructor.map(|build| build(&self.settings.state))
    }

    /// Check a state against the configured limits before it is persisted
    pub fn check_state(&self, state: &ConversationState) -> Result<()> {
        if let Err(e) = state.validate_against(&self.settings.state.limits) {
            let summary = state.summary();
            warn!(
                error = %e,
                current_flow = ?summary.current_flow,
                answer_count = summary.answer_count,
                "State exceeds configured limits"
            );
            return Err(e);
        }
        Ok(())
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("settings", &self.settings)
            .field("session_capability", &self.session_capability)
            .field("state_already_added", &self.state_already_added)
            .field("has_state_constructor", &self.state_constructor.is_some())
            .finish()
    }
}

impl SessionCapable for AppContext {
    fn add_session_capability(&mut self) {
        self.session_capability = true;
    }
}

impl StateHost for AppContext {
    fn state_already_added(&self) -> bool {
        self.state_already_added
    }

    fn mark_state_added(&mut self) {
        self.state_already_added = true;
    }

    fn set_state_constructor(&mut self, constructor: StateConstructor) {
        self.state_constructor = Some(constructor);
    }
}
