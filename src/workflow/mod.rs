//! Workflow definition and transition-resolution engine.
//!
//! A [`Workflow`] is built once by declaring states and transitions, checked
//! with [`Workflow::check`], and then shared read-only. Runtime operations
//! take the content object explicitly; the engine only reads and writes the
//! content's state attribute and never keeps per-content data of its own.
//!
//! Operations on the same content object are not atomic as a group. Callers
//! that share content across threads must serialize access themselves.

mod callbacks;
mod state;
mod transition;

pub use callbacks::{Callback, CallbackArgs, callback};
pub use state::{State, StateEntry, StateSpec};
pub use transition::{Transition, TransitionSpec};

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::content::Content;
use crate::error::{Error, Result, WorkflowError};
use crate::permission::PermissionOracle;

/// Free-form data attached to a state or transition.
pub type Metadata = IndexMap<String, serde_json::Value>;

/// Identity and storage settings of a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowOptions {
    /// Separates several workflows applied to the same content type.
    #[serde(rename = "type")]
    pub workflow_type: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Help text; not used by the engine.
    #[serde(default)]
    pub description: String,

    /// Content attribute holding the current state name.
    #[serde(default = "default_state_attr")]
    pub state_attr: String,

    /// State assigned by [`Workflow::initialize`].
    pub initial_state: String,
}

fn default_state_attr() -> String {
    "state".to_string()
}

impl WorkflowOptions {
    pub fn new(workflow_type: impl Into<String>, initial_state: impl Into<String>) -> Self {
        let workflow_type = workflow_type.into();
        Self {
            name: workflow_type.clone(),
            workflow_type,
            description: String::new(),
            state_attr: default_state_attr(),
            initial_state: initial_state.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_state_attr(mut self, state_attr: impl Into<String>) -> Self {
        self.state_attr = state_attr.into();
        self
    }
}

/// A finite state machine over content of type `T`, driven by callers
/// described by a request of type `R`.
pub struct Workflow<T, R = ()> {
    options: WorkflowOptions,
    states: IndexMap<String, State<T, R>>,
    transitions: IndexMap<String, Transition<T, R>>,
    oracle: Arc<dyn PermissionOracle<T, R>>,
}

impl<T, R> fmt::Debug for Workflow<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("options", &self.options)
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .field("transitions", &self.transitions.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<T, R> Workflow<T, R> {
    pub fn new(options: WorkflowOptions, oracle: impl PermissionOracle<T, R> + 'static) -> Self {
        Self {
            options,
            states: IndexMap::new(),
            transitions: IndexMap::new(),
            oracle: Arc::new(oracle),
        }
    }

    pub fn options(&self) -> &WorkflowOptions {
        &self.options
    }

    pub fn workflow_type(&self) -> &str {
        &self.options.workflow_type
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn description(&self) -> &str {
        &self.options.description
    }

    pub fn state_attr(&self) -> &str {
        &self.options.state_attr
    }

    pub fn initial_state(&self) -> &str {
        &self.options.initial_state
    }

    /// Declared states in declaration order.
    pub fn states(&self) -> impl Iterator<Item = &State<T, R>> {
        self.states.values()
    }

    /// Declared transitions in declaration order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition<T, R>> {
        self.transitions.values()
    }

    pub fn find_state(&self, name: &str) -> Option<&State<T, R>> {
        self.states.get(name)
    }

    pub fn find_transition(&self, name: &str) -> Option<&Transition<T, R>> {
        self.transitions.get(name)
    }

    /// Declare a state.
    ///
    /// Fails with [`WorkflowError::DuplicateState`] if `name` is taken; the
    /// graph is left untouched in that case.
    pub fn add_state(
        &mut self,
        name: impl Into<String>,
        spec: StateSpec<T, R>,
    ) -> Result<&State<T, R>, WorkflowError> {
        match self.states.entry(name.into()) {
            Entry::Occupied(entry) => Err(WorkflowError::DuplicateState {
                workflow: self.options.workflow_type.clone(),
                state: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                let state = State {
                    name: entry.key().clone(),
                    callback: spec.callback,
                    metadata: spec.metadata,
                };
                Ok(&*entry.insert(state))
            }
        }
    }

    /// Declare a transition between two already declared states.
    pub fn add_transition(
        &mut self,
        name: impl Into<String>,
        from_state: impl Into<String>,
        to_state: impl Into<String>,
        spec: TransitionSpec<T, R>,
    ) -> Result<&Transition<T, R>, WorkflowError> {
        let name = name.into();
        let from_state = from_state.into();
        let to_state = to_state.into();

        if self.transitions.contains_key(&name) {
            return Err(WorkflowError::DuplicateTransition {
                workflow: self.options.workflow_type.clone(),
                transition: name,
            });
        }
        for endpoint in [&from_state, &to_state] {
            if !self.states.contains_key(endpoint) {
                return Err(WorkflowError::DanglingEndpoint {
                    workflow: self.options.workflow_type.clone(),
                    transition: name,
                    state: endpoint.clone(),
                });
            }
        }

        let transition = Transition {
            name: name.clone(),
            from_state,
            to_state,
            callback: spec.callback,
            permission: spec.permission,
            metadata: spec.metadata,
        };
        Ok(&*self.transitions.entry(name).or_insert(transition))
    }

    /// Verify the graph: the initial state and every transition endpoint must
    /// be declared. Reports the first inconsistency found.
    pub fn check(&self) -> Result<(), WorkflowError> {
        if !self.states.contains_key(&self.options.initial_state) {
            return Err(WorkflowError::UnknownInitialState {
                workflow: self.options.workflow_type.clone(),
                state: self.options.initial_state.clone(),
            });
        }
        for transition in self.transitions.values() {
            for endpoint in [&transition.from_state, &transition.to_state] {
                if !self.states.contains_key(endpoint) {
                    return Err(WorkflowError::DanglingEndpoint {
                        workflow: self.options.workflow_type.clone(),
                        transition: transition.name.clone(),
                        state: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl<T: Content, R> Workflow<T, R> {
    /// The content's current state for this workflow, if it has one.
    pub fn state_of<'c>(&self, content: &'c T) -> Option<&'c str> {
        content.state(&self.options.state_attr)
    }

    pub fn has_state(&self, content: &T) -> bool {
        self.state_of(content).is_some()
    }

    /// Transitions leaving `from_state` (default: the content's current
    /// state) that the permission oracle lets the caller execute, in
    /// declaration order.
    pub fn get_transitions(
        &self,
        content: &T,
        request: &R,
        from_state: Option<&str>,
    ) -> Vec<&Transition<T, R>> {
        let Some(from_state) = from_state.or_else(|| self.state_of(content)) else {
            return Vec::new();
        };
        self.transitions
            .values()
            .filter(|t| t.from_state == from_state)
            .filter(|t| {
                let allowed = self.oracle.allows(t.permission(), content, request);
                if !allowed {
                    debug!(
                        workflow = %self.options.workflow_type,
                        transition = %t.name,
                        "transition hidden by permission check"
                    );
                }
                allowed
            })
            .collect()
    }

    /// One entry per declared state. `current` is computed against
    /// `from_state` (default: the content's current state). States whose
    /// outgoing transitions are all denied are still listed, with an empty
    /// transition list.
    pub fn get_states(
        &self,
        content: &T,
        request: &R,
        from_state: Option<&str>,
    ) -> Vec<StateEntry<'_, T, R>> {
        let reference = from_state.or_else(|| self.state_of(content));
        self.states
            .values()
            .map(|state| StateEntry {
                state,
                title: state.title(),
                initial: state.name == self.options.initial_state,
                current: reference == Some(state.name.as_str()),
                transitions: self.get_transitions(content, request, Some(&state.name)),
            })
            .collect()
    }

    /// Put the content in the initial state, whatever state it had before,
    /// and run the initial state's callback.
    pub fn initialize(&self, content: &mut T, request: Option<&R>) -> Result<(String, Option<String>)> {
        let state = self
            .states
            .get(&self.options.initial_state)
            .ok_or_else(|| WorkflowError::UnknownInitialState {
                workflow: self.options.workflow_type.clone(),
                state: self.options.initial_state.clone(),
            })?;

        let message = self.enter(content, state, None, request)?;
        content.set_state(&self.options.state_attr, &state.name);
        info!(
            workflow = %self.options.workflow_type,
            content = %content.describe(),
            state = %state.name,
            "content initialized"
        );
        Ok((state.name.clone(), message))
    }

    /// Re-enter the content's current state, running its callback again.
    /// Content without a state is initialized instead.
    pub fn reset(&self, content: &mut T, request: Option<&R>) -> Result<(String, Option<String>)> {
        let Some(current) = self.state_of(content).map(str::to_owned) else {
            return self.initialize(content, request);
        };
        let state = self
            .states
            .get(&current)
            .ok_or_else(|| WorkflowError::UnknownState {
                workflow: self.options.workflow_type.clone(),
                content: content.describe(),
                state: current.clone(),
            })?;

        let message = self.enter(content, state, None, request)?;
        content.set_state(&self.options.state_attr, &state.name);
        info!(
            workflow = %self.options.workflow_type,
            content = %content.describe(),
            state = %state.name,
            "content reset"
        );
        Ok((current, message))
    }

    /// Execute the transition named `transition_name`.
    ///
    /// The content must currently be in the transition's source state and
    /// the oracle must allow it. The transition callback runs first, then the
    /// target state's callback; the new state is written only once both have
    /// succeeded. Returns the transition callback's message.
    pub fn transition(&self, content: &mut T, request: &R, transition_name: &str) -> Result<Option<String>> {
        let transition = self
            .transitions
            .get(transition_name)
            .ok_or_else(|| WorkflowError::UnknownTransition {
                workflow: self.options.workflow_type.clone(),
                transition: transition_name.to_string(),
            })?;

        let current = self.state_of(content);
        if current != Some(transition.from_state.as_str()) {
            return Err(WorkflowError::WrongSourceState {
                workflow: self.options.workflow_type.clone(),
                content: content.describe(),
                transition: transition.name.clone(),
                expected: transition.from_state.clone(),
                actual: current.map(str::to_owned),
            }
            .into());
        }

        if !self.oracle.allows(transition.permission(), content, request) {
            return Err(WorkflowError::PermissionDenied {
                workflow: self.options.workflow_type.clone(),
                content: content.describe(),
                transition: transition.name.clone(),
            }
            .into());
        }

        let target = self
            .states
            .get(&transition.to_state)
            .ok_or_else(|| WorkflowError::DanglingEndpoint {
                workflow: self.options.workflow_type.clone(),
                transition: transition.name.clone(),
                state: transition.to_state.clone(),
            })?;

        let message = match &transition.callback {
            Some(callback) => {
                let args = CallbackArgs {
                    workflow: self,
                    transition: Some(transition),
                    request: Some(request),
                };
                callback(content, &args).map_err(Error::from_callback)?
            }
            None => None,
        };
        self.enter(content, target, Some(transition), Some(request))?;
        content.set_state(&self.options.state_attr, &target.name);

        info!(
            workflow = %self.options.workflow_type,
            content = %content.describe(),
            transition = %transition.name,
            from = %transition.from_state,
            to = %transition.to_state,
            "transition executed"
        );
        Ok(message)
    }

    /// Bring the content to `to_state` through any permitted transition.
    ///
    /// Candidates are the permitted transitions from the current state that
    /// end in `to_state`; they are tried in declaration order and the first
    /// one that completes wins. A candidate failing with a [`WorkflowError`]
    /// (including one raised by its callbacks) is skipped, any other callback
    /// error is returned immediately. With `skip_same`, content already in
    /// `to_state` is left alone and `Ok(None)` is returned.
    pub fn transition_to_state(
        &self,
        content: &mut T,
        request: &R,
        to_state: &str,
        skip_same: bool,
    ) -> Result<Option<String>> {
        if skip_same && self.state_of(content) == Some(to_state) {
            debug!(
                workflow = %self.options.workflow_type,
                content = %content.describe(),
                state = %to_state,
                "content already in target state"
            );
            return Ok(None);
        }

        let candidates: Vec<&str> = self
            .get_transitions(content, request, None)
            .into_iter()
            .filter(|t| t.to_state == to_state)
            .map(Transition::name)
            .collect();

        let mut last_failure = None;
        for name in candidates {
            match self.transition(content, request, name) {
                Ok(message) => return Ok(message),
                Err(Error::Workflow(err)) => {
                    warn!(
                        workflow = %self.options.workflow_type,
                        transition = %name,
                        error = %err,
                        "candidate transition failed"
                    );
                    last_failure = Some(err.to_string());
                }
                Err(err) => return Err(err),
            }
        }

        Err(WorkflowError::NoTransitionToState {
            workflow: self.options.workflow_type.clone(),
            content: content.describe(),
            to_state: to_state.to_string(),
            last_failure,
        }
        .into())
    }

    fn enter(
        &self,
        content: &mut T,
        state: &State<T, R>,
        transition: Option<&Transition<T, R>>,
        request: Option<&R>,
    ) -> Result<Option<String>> {
        let Some(callback) = &state.callback else {
            return Ok(None);
        };
        let args = CallbackArgs {
            workflow: self,
            transition,
            request,
        };
        callback(content, &args).map_err(Error::from_callback)
    }
}
