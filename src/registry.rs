//! Lookup of workflows by type and content type.
//!
//! A registry is an ordinary value handed to whoever needs workflows; there
//! is no process-wide table. Workflows registered without a content type act
//! as defaults for every content type that has no workflow of its own.

use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::debug;

use crate::error::WorkflowError;
use crate::workflow::Workflow;

type Key = (String, Option<String>);

pub struct WorkflowRegistry<T, R = ()> {
    workflows: IndexMap<Key, Arc<Workflow<T, R>>>,
}

impl<T, R> Default for WorkflowRegistry<T, R> {
    fn default() -> Self {
        Self {
            workflows: IndexMap::new(),
        }
    }
}

impl<T, R> WorkflowRegistry<T, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `workflow` and register it for `content_type`, or as the
    /// default of its type when `content_type` is `None`.
    pub fn register(
        &mut self,
        workflow: Workflow<T, R>,
        content_type: Option<&str>,
    ) -> Result<Arc<Workflow<T, R>>, WorkflowError> {
        workflow.check()?;
        let key = (
            workflow.workflow_type().to_string(),
            content_type.map(str::to_owned),
        );
        match self.workflows.entry(key) {
            Entry::Occupied(entry) => Err(WorkflowError::DuplicateRegistration {
                workflow: entry.key().0.clone(),
                content_type: entry.key().1.clone(),
            }),
            Entry::Vacant(entry) => {
                debug!(
                    workflow = %entry.key().0,
                    content_type = entry.key().1.as_deref().unwrap_or("*"),
                    "workflow registered"
                );
                Ok(Arc::clone(entry.insert(Arc::new(workflow))))
            }
        }
    }

    /// The workflow of `workflow_type` for `content_type`, falling back to
    /// the default workflow of that type.
    pub fn lookup(&self, workflow_type: &str, content_type: Option<&str>) -> Option<Arc<Workflow<T, R>>> {
        let exact = content_type.and_then(|ct| {
            self.workflows
                .get(&(workflow_type.to_string(), Some(ct.to_string())))
        });
        exact
            .or_else(|| self.workflows.get(&(workflow_type.to_string(), None)))
            .cloned()
    }

    /// Every workflow applicable to `content_type`: its own registrations
    /// first, then defaults whose type it does not override.
    pub fn workflows_for(&self, content_type: Option<&str>) -> Vec<Arc<Workflow<T, R>>> {
        let own: Vec<_> = self
            .workflows
            .iter()
            .filter(|((_, ct), _)| content_type.is_some() && ct.as_deref() == content_type)
            .map(|(_, wf)| Arc::clone(wf))
            .collect();
        let defaults = self
            .workflows
            .iter()
            .filter(|((ty, ct), _)| ct.is_none() && !own.iter().any(|wf| wf.workflow_type() == ty.as_str()))
            .map(|(_, wf)| Arc::clone(wf))
            .collect::<Vec<_>>();
        own.into_iter().chain(defaults).collect()
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}
