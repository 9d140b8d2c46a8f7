use thiserror::Error;

/// Failures raised by the workflow engine itself.
///
/// Every variant names the workflow type so that errors coming from several
/// workflows applied to the same content can be told apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("workflow '{workflow}': state '{state}' already exists")]
    DuplicateState { workflow: String, state: String },

    #[error("workflow '{workflow}': transition '{transition}' already exists")]
    DuplicateTransition { workflow: String, transition: String },

    #[error("workflow '{workflow}': transition '{transition}' references unknown state '{state}'")]
    DanglingEndpoint {
        workflow: String,
        transition: String,
        state: String,
    },

    #[error("workflow '{workflow}': initial state '{state}' is not declared")]
    UnknownInitialState { workflow: String, state: String },

    #[error("workflow '{workflow}': {content} is in undeclared state '{state}'")]
    UnknownState {
        workflow: String,
        content: String,
        state: String,
    },

    #[error("workflow '{workflow}': no transition named '{transition}'")]
    UnknownTransition { workflow: String, transition: String },

    #[error(
        "workflow '{workflow}': transition '{transition}' fires from '{expected}' but {content} is in {}",
        .actual.as_deref().map_or_else(|| "no state".to_string(), |s| format!("'{s}'"))
    )]
    WrongSourceState {
        workflow: String,
        content: String,
        transition: String,
        expected: String,
        actual: Option<String>,
    },

    #[error("workflow '{workflow}': permission denied for transition '{transition}' on {content}")]
    PermissionDenied {
        workflow: String,
        content: String,
        transition: String,
    },

    #[error(
        "workflow '{workflow}': no transition found to bring {content} to state '{to_state}'{}",
        .last_failure.as_deref().map(|f| format!(" (last failure: {f})")).unwrap_or_default()
    )]
    NoTransitionToState {
        workflow: String,
        content: String,
        to_state: String,
        last_failure: Option<String>,
    },

    #[error("workflow '{workflow}' is already registered for {}", .content_type.as_deref().unwrap_or("all content types"))]
    DuplicateRegistration {
        workflow: String,
        content_type: Option<String>,
    },
}

/// Error returned by runtime workflow operations.
///
/// Callbacks may fail with arbitrary errors. Those pass through untouched as
/// [`Error::Callback`], except when the callback itself returned a
/// [`WorkflowError`], which is surfaced as [`Error::Workflow`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Callback(anyhow::Error),
}

impl Error {
    /// Classify an error raised by a state or transition callback.
    pub fn from_callback(err: anyhow::Error) -> Self {
        match err.downcast::<WorkflowError>() {
            Ok(workflow) => Error::Workflow(workflow),
            Err(other) => Error::Callback(other),
        }
    }

    /// The engine-level failure, if this is one.
    pub fn as_workflow(&self) -> Option<&WorkflowError> {
        match self {
            Error::Workflow(err) => Some(err),
            Error::Callback(_) => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
