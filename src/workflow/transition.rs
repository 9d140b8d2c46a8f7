use std::fmt;

use serde_json::Value;

use super::{Callback, Metadata};

/// A named, directed edge between two states.
pub struct Transition<T, R> {
    pub(super) name: String,
    pub(super) from_state: String,
    pub(super) to_state: String,
    pub(super) callback: Option<Callback<T, R>>,
    pub(super) permission: Option<String>,
    pub(super) metadata: Metadata,
}

impl<T, R> Transition<T, R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn from_state(&self) -> &str {
        &self.from_state
    }

    pub fn to_state(&self) -> &str {
        &self.to_state
    }

    pub fn callback(&self) -> Option<&Callback<T, R>> {
        self.callback.as_ref()
    }

    /// Token handed to the permission oracle before this transition fires.
    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl<T, R> fmt::Debug for Transition<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("name", &self.name)
            .field("from_state", &self.from_state)
            .field("to_state", &self.to_state)
            .field("callback", &self.callback.is_some())
            .field("permission", &self.permission)
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Optional parts of a transition declaration.
pub struct TransitionSpec<T, R> {
    pub callback: Option<Callback<T, R>>,
    pub permission: Option<String>,
    pub metadata: Metadata,
}

impl<T, R> Default for TransitionSpec<T, R> {
    fn default() -> Self {
        Self {
            callback: None,
            permission: None,
            metadata: Metadata::new(),
        }
    }
}

impl<T, R> TransitionSpec<T, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(mut self, callback: Callback<T, R>) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata.extend(metadata);
        self
    }
}
