//! Content objects governed by a workflow.
//!
//! The engine never owns a content object's state. It reads and writes a
//! named attribute through [`Content`]; persisting that attribute is up to
//! the content layer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Accessor for the attribute a workflow stores its current state in.
pub trait Content {
    /// Current value of `attr`, or `None` when the content has no state there.
    fn state(&self, attr: &str) -> Option<&str>;

    /// Record `state` under `attr`.
    fn set_state(&mut self, attr: &str, state: &str);

    /// Human-readable label used in error messages.
    fn describe(&self) -> String {
        "content".to_string()
    }
}

/// An in-memory content object with an ordered bag of string attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Builder-style attribute assignment, handy for seeding a known state.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl Content for Document {
    fn state(&self, attr: &str) -> Option<&str> {
        self.attributes.get(attr).map(String::as_str)
    }

    fn set_state(&mut self, attr: &str, state: &str) {
        self.attributes.insert(attr.to_string(), state.to_string());
    }

    fn describe(&self) -> String {
        format!("document '{}'", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_state_reads_named_attribute() {
        let doc = Document::new("doc-1").with_attribute("review_state", "draft");
        assert_eq!(doc.state("review_state"), Some("draft"));
        assert_eq!(doc.state("state"), None);
    }

    #[test]
    fn set_state_overwrites() {
        let mut doc = Document::new("doc-1");
        doc.set_state("state", "draft");
        doc.set_state("state", "published");
        assert_eq!(doc.state("state"), Some("published"));
        assert_eq!(doc.attributes.len(), 1);
    }

    #[test]
    fn document_serializes_attributes_in_order() {
        let doc = Document::new("doc-1")
            .with_attribute("state", "draft")
            .with_attribute("author", "ana");
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(
            json,
            r#"{"id":"doc-1","attributes":{"state":"draft","author":"ana"}}"#
        );
        assert_eq!(doc.describe(), "document 'doc-1'");
    }
}
