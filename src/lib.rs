//! Finite state machine engine for content lifecycle workflows.
//!
//! A [`Workflow`] declares named states and transitions. At runtime it reads
//! and writes a content object's state attribute through [`Content`], asks a
//! [`PermissionOracle`] whether the caller may use a transition, and runs the
//! state and transition callbacks.
//!
//! ```
//! use contentflow::{AllowAll, Content, Document, StateSpec, TransitionSpec, Workflow, WorkflowOptions};
//!
//! let mut workflow: Workflow<Document> =
//!     Workflow::new(WorkflowOptions::new("publication", "draft"), AllowAll);
//! workflow.add_state("draft", StateSpec::new())?;
//! workflow.add_state("published", StateSpec::new())?;
//! workflow.add_transition("publish", "draft", "published", TransitionSpec::new())?;
//! workflow.check()?;
//!
//! let mut doc = Document::new("doc-1");
//! workflow.initialize(&mut doc, None)?;
//! workflow.transition_to_state(&mut doc, &(), "published", true)?;
//! assert_eq!(doc.state("state"), Some("published"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod permission;
pub mod registry;
pub mod workflow;

pub use config::{CallbackSlot, WorkflowDefinition, definition_path};
pub use content::{Content, Document};
pub use error::{Error, Result, WorkflowError};
pub use permission::{AllowAll, GrantOracle, Grants, PermissionOracle};
pub use registry::WorkflowRegistry;
pub use workflow::{
    Callback, CallbackArgs, Metadata, State, StateEntry, StateSpec, Transition, TransitionSpec, Workflow,
    WorkflowOptions, callback,
};
