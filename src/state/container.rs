//! Conversation state container
//!
//! This module holds the per-session state of a voice app: the flow the
//! session is in, the last prompt presented, the answers gathered so far
//! and how many times each prompt has been presented. Every value is
//! addressed by a token (see [`crate::state::token`]).

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::{StateConfig, StateLimits};
use crate::utils::errors::{VuiStateError, Result};
use crate::utils::logging;
use super::token;
use super::tree::{StateNode, StateTree};

/// Per-session conversation state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationState {
    current_flow: Option<String>,
    last_prompt: Option<String>,
    gathered_answers: StateTree<Value>,
    auto_increment_prompts: bool,
    prompt_counts: StateTree<u64>,
}

/// Serialized form; field order is part of the format
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateRecord<'a> {
    current_flow: &'a str,
    last_prompt: &'a str,
    gathered_answers: &'a StateTree<Value>,
    auto_increment_prompts: bool,
    prompt_counts: &'a StateTree<u64>,
}

/// Parsed form; every field is optional and trusted as canonical
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredState {
    #[serde(deserialize_with = "string_or_unset")]
    current_flow: Option<String>,
    #[serde(deserialize_with = "string_or_unset")]
    last_prompt: Option<String>,
    #[serde(deserialize_with = "tree_or_empty")]
    gathered_answers: StateTree<Value>,
    #[serde(deserialize_with = "flag_or_false")]
    auto_increment_prompts: bool,
    #[serde(deserialize_with = "tree_or_empty")]
    prompt_counts: StateTree<u64>,
}

fn string_or_unset<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

fn flag_or_false<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

fn tree_or_empty<'de, D, T>(deserializer: D) -> std::result::Result<StateTree<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<StateTree<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// State summary for logging and debugging
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSummary {
    pub current_flow: Option<String>,
    pub last_prompt: Option<String>,
    pub answer_count: usize,
    pub prompt_count_entries: usize,
    pub auto_increment_prompts: bool,
}

impl ConversationState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty state with the configured defaults applied
    pub fn with_config(config: &StateConfig) -> Self {
        let mut state = Self::new();
        if config.auto_increment_prompts {
            state.enable_prompt_count_auto_increment();
        }
        state
    }

    /// Reset every field, including the auto-increment flag
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Set the flow the session is in; degenerate tokens are ignored
    pub fn set_current_flow(&mut self, token: &str) -> bool {
        if token::is_degenerate(token) {
            logging::log_degenerate_token("set_current_flow", token);
            return false;
        }
        let flow = token::normalize(token);
        logging::log_flow_change(self.current_flow.as_deref(), &flow);
        self.current_flow = Some(flow);
        true
    }

    pub fn current_flow(&self) -> Option<&str> {
        self.current_flow.as_deref()
    }

    /// Record the last prompt presented, bumping its count when
    /// auto-increment is enabled. Degenerate tokens are ignored.
    pub fn set_last_prompt(&mut self, token: &str) -> bool {
        if token::is_degenerate(token) {
            logging::log_degenerate_token("set_last_prompt", token);
            return false;
        }
        let prompt = token::normalize(token);
        if self.auto_increment_prompts {
            self.increment_prompted_count(&prompt);
        }
        logging::log_prompt_presented(&prompt, self.get_prompted_count(&prompt));
        self.last_prompt = Some(prompt);
        true
    }

    pub fn last_prompt(&self) -> Option<&str> {
        self.last_prompt.as_deref()
    }

    pub fn enable_prompt_count_auto_increment(&mut self) {
        self.auto_increment_prompts = true;
    }

    pub fn disable_prompt_count_auto_increment(&mut self) {
        self.auto_increment_prompts = false;
    }

    pub fn is_prompt_count_auto_increment_enabled(&self) -> bool {
        self.auto_increment_prompts
    }

    /// Store any serializable value as the answer for `token`
    pub fn set_answer<T: Serialize>(&mut self, token: &str, value: T) -> Result<bool> {
        let value = serde_json::to_value(value)?;
        Ok(self.set_answer_value(token, Some(value)))
    }

    /// Store or delete the answer for `token`.
    ///
    /// `None` deletes whatever is stored at the token, and does nothing when
    /// the token was never set. Returns whether the tree changed.
    pub fn set_answer_value(&mut self, token: &str, value: Option<Value>) -> bool {
        let Some(path) = token::segments(token) else {
            logging::log_degenerate_token("set_answer", token);
            return false;
        };

        match value {
            None => {
                let removed = self.gathered_answers.remove(&path).is_some();
                debug!(token = %path.join("."), removed = removed, "Answer cleared");
                removed
            }
            Some(value) => {
                if self.gathered_answers.insert(&path, StateNode::from_value(value)).is_err() {
                    logging::log_blocked_path("set_answer", &path.join("."));
                    return false;
                }
                debug!(token = %path.join("."), "Answer stored");
                true
            }
        }
    }

    /// Delete the answer stored for `token`
    pub fn clear_answer(&mut self, token: &str) -> bool {
        self.set_answer_value(token, None)
    }

    /// The answer stored for `token`; nested answers come back as objects
    pub fn get_answer(&self, token: &str) -> Option<Value> {
        let path = token::segments(token)?;
        self.gathered_answers.get(&path).map(StateNode::to_value)
    }

    /// The answer stored for `token`, decoded into `T`
    pub fn get_answer_as<T: DeserializeOwned>(&self, token: &str) -> Result<Option<T>> {
        match self.get_answer(token) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Count one more presentation of the prompt `token`
    pub fn increment_prompted_count(&mut self, token: &str) -> bool {
        let Some(path) = token::segments(token) else {
            logging::log_degenerate_token("increment_prompted_count", token);
            return false;
        };

        match self.prompt_counts.upsert_leaf(&path, 1, |count| *count = count.saturating_add(1)) {
            Ok(()) => true,
            Err(_) => {
                logging::log_blocked_path("increment_prompted_count", &path.join("."));
                false
            }
        }
    }

    /// Set an existing prompt count back to zero; unknown tokens are left alone
    pub fn reset_prompted_count(&mut self, token: &str) -> bool {
        let Some(path) = token::segments(token) else {
            logging::log_degenerate_token("reset_prompted_count", token);
            return false;
        };

        match self.prompt_counts.leaf_mut(&path) {
            Ok(count) => {
                *count = 0;
                true
            }
            Err(_) => false,
        }
    }

    /// Times the prompt `token` was presented.
    ///
    /// Unknown prompts count as `0`; only a degenerate token gives `None`.
    pub fn get_prompted_count(&self, token: &str) -> Option<u64> {
        let path = token::segments(token)?;
        Some(self.prompt_counts.get_leaf(&path).copied().unwrap_or(0))
    }

    /// Serialize to the compact JSON format
    pub fn to_json(&self) -> Result<String> {
        let record = StateRecord {
            current_flow: self.current_flow.as_deref().unwrap_or(""),
            last_prompt: self.last_prompt.as_deref().unwrap_or(""),
            gathered_answers: &self.gathered_answers,
            auto_increment_prompts: self.auto_increment_prompts,
            prompt_counts: &self.prompt_counts,
        };
        Ok(serde_json::to_string(&record)?)
    }

    /// Rebuild a state from its JSON form without re-normalizing tokens
    pub fn from_json(json: &str) -> Result<Self> {
        let stored: StoredState = serde_json::from_str(json)?;
        Ok(Self {
            current_flow: stored.current_flow,
            last_prompt: stored.last_prompt,
            gathered_answers: stored.gathered_answers,
            auto_increment_prompts: stored.auto_increment_prompts,
            prompt_counts: stored.prompt_counts,
        })
    }

    /// Create a summary of the state for logging
    pub fn summary(&self) -> StateSummary {
        StateSummary {
            current_flow: self.current_flow.clone(),
            last_prompt: self.last_prompt.clone(),
            answer_count: self.gathered_answers.leaf_count(),
            prompt_count_entries: self.prompt_counts.leaf_count(),
            auto_increment_prompts: self.auto_increment_prompts,
        }
    }

    /// Validate state against host limits
    pub fn validate_against(&self, limits: &StateLimits) -> Result<()> {
        let answers = self.gathered_answers.leaf_count();
        if answers > limits.max_answer_entries {
            return Err(VuiStateError::LimitExceeded {
                what: "gathered answers".to_string(),
                actual: answers,
                limit: limits.max_answer_entries,
            });
        }

        let depth = self.gathered_answers.depth().max(self.prompt_counts.depth());
        if depth > limits.max_token_depth {
            return Err(VuiStateError::LimitExceeded {
                what: "token depth".to_string(),
                actual: depth,
                limit: limits.max_token_depth,
            });
        }

        let size = self.to_json()?.len();
        if size > limits.max_serialized_size {
            return Err(VuiStateError::LimitExceeded {
                what: "serialized size".to_string(),
                actual: size,
                limit: limits.max_serialized_size,
            });
        }

        Ok(())
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.to_json().map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl FromStr for ConversationState {
    type Err = VuiStateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}
