use std::fmt;

use serde_json::Value;

use super::{Callback, Metadata, Transition};

/// A named node in the workflow graph.
pub struct State<T, R> {
    pub(super) name: String,
    pub(super) callback: Option<Callback<T, R>>,
    pub(super) metadata: Metadata,
}

impl<T, R> State<T, R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry callback, run whenever content enters this state.
    pub fn callback(&self) -> Option<&Callback<T, R>> {
        self.callback.as_ref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The `title` metadata entry, falling back to the state name.
    pub fn title(&self) -> &str {
        self.metadata
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(&self.name)
    }
}

impl<T, R> fmt::Debug for State<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("callback", &self.callback.is_some())
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Optional parts of a state declaration.
pub struct StateSpec<T, R> {
    pub callback: Option<Callback<T, R>>,
    pub metadata: Metadata,
}

impl<T, R> Default for StateSpec<T, R> {
    fn default() -> Self {
        Self {
            callback: None,
            metadata: Metadata::new(),
        }
    }
}

impl<T, R> StateSpec<T, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(mut self, callback: Callback<T, R>) -> Self {
        self.callback = Some(callback);
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

/// One row of [`Workflow::get_states`](super::Workflow::get_states).
pub struct StateEntry<'a, T, R> {
    pub state: &'a State<T, R>,
    pub title: &'a str,
    pub initial: bool,
    pub current: bool,
    /// Transitions out of this state the caller is allowed to execute.
    pub transitions: Vec<&'a Transition<T, R>>,
}

impl<T, R> StateEntry<'_, T, R> {
    pub fn name(&self) -> &str {
        self.state.name()
    }

    pub fn metadata(&self) -> &Metadata {
        self.state.metadata()
    }
}

impl<T, R> fmt::Debug for StateEntry<'_, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateEntry")
            .field("state", &self.state.name)
            .field("title", &self.title)
            .field("initial", &self.initial)
            .field("current", &self.current)
            .field(
                "transitions",
                &self.transitions.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
