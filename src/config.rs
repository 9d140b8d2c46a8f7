//! Definições de workflow carregadas a partir de arquivos TOML.
//!
//! A struct [`WorkflowDefinition`] descreve estados e transições de um workflow.
//! [`WorkflowDefinition::build`] monta e verifica o [`Workflow`] correspondente.
//! A variável de ambiente `CONTENTFLOW_DEFINITION` tem precedência sobre o arquivo padrão.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::WorkflowError;
use crate::permission::PermissionOracle;
use crate::workflow::{Callback, Metadata, StateSpec, TransitionSpec, Workflow, WorkflowOptions};

/// Arquivo de definição usado quando nada mais é informado.
pub const DEFAULT_DEFINITION_FILE: &str = "workflow.toml";

/// Variável de ambiente que aponta para o arquivo de definição.
pub const DEFINITION_ENV_VAR: &str = "CONTENTFLOW_DEFINITION";

/// Definição completa de um workflow, como escrita em TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowDefinition {
    /// Tipo, nome, atributo de estado e estado inicial.
    #[serde(flatten)]
    pub options: WorkflowOptions,

    /// Estados na ordem de declaração.
    #[serde(default)]
    pub states: Vec<StateDefinition>,

    /// Transições na ordem de declaração.
    #[serde(default)]
    pub transitions: Vec<TransitionDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateDefinition {
    pub name: String,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransitionDefinition {
    pub name: String,
    pub from_state: String,
    pub to_state: String,
    /// Permissão exigida pelo oráculo; ausente significa transição livre.
    #[serde(default)]
    pub permission: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Ponto da definição onde um callback pode ser conectado.
#[derive(Debug, Clone, Copy)]
pub enum CallbackSlot<'a> {
    State { name: &'a str, metadata: &'a Metadata },
    Transition { name: &'a str, metadata: &'a Metadata },
}

impl CallbackSlot<'_> {
    pub fn metadata(&self) -> &Metadata {
        match self {
            CallbackSlot::State { metadata, .. } | CallbackSlot::Transition { metadata, .. } => metadata,
        }
    }
}

impl WorkflowDefinition {
    /// Carrega uma definição de `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read workflow definition {}", path.display()))?;
        toml::from_str::<WorkflowDefinition>(&contents)
            .with_context(|| format!("invalid workflow definition {}", path.display()))
    }

    /// Monta o workflow sem callbacks.
    pub fn build<T, R>(
        &self,
        oracle: impl PermissionOracle<T, R> + 'static,
    ) -> Result<Workflow<T, R>, WorkflowError> {
        self.build_with(oracle, |_| None)
    }

    /// Monta o workflow, pedindo a `hooks` um callback para cada estado e
    /// transição, e verifica a consistência do grafo resultante.
    pub fn build_with<T, R, H>(
        &self,
        oracle: impl PermissionOracle<T, R> + 'static,
        mut hooks: H,
    ) -> Result<Workflow<T, R>, WorkflowError>
    where
        H: FnMut(CallbackSlot<'_>) -> Option<Callback<T, R>>,
    {
        let mut workflow = Workflow::new(self.options.clone(), oracle);

        for state in &self.states {
            let mut spec = StateSpec::new().with_metadata(state.metadata.clone());
            spec.callback = hooks(CallbackSlot::State {
                name: &state.name,
                metadata: &state.metadata,
            });
            workflow.add_state(state.name.as_str(), spec)?;
        }

        for transition in &self.transitions {
            let mut spec = TransitionSpec::new().with_metadata(transition.metadata.clone());
            spec.permission = transition.permission.clone();
            spec.callback = hooks(CallbackSlot::Transition {
                name: &transition.name,
                metadata: &transition.metadata,
            });
            workflow.add_transition(
                transition.name.as_str(),
                transition.from_state.as_str(),
                transition.to_state.as_str(),
                spec,
            )?;
        }

        workflow.check()?;
        Ok(workflow)
    }
}

/// Resolve o caminho do arquivo de definição.
/// Ordem: argumento da CLI, variável `CONTENTFLOW_DEFINITION`, `workflow.toml`.
pub fn definition_path(cli_override: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_override {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var(DEFINITION_ENV_VAR)
        && !path.is_empty()
    {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_DEFINITION_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Content, Document};
    use crate::permission::{AllowAll, GrantOracle, Grants};
    use crate::workflow::callback;

    const PUBLICATION: &str = r#"
        type = "publication"
        name = "Publication"
        initial_state = "draft"

        [[states]]
        name = "draft"
        [states.metadata]
        title = "Draft"

        [[states]]
        name = "published"

        [[transitions]]
        name = "publish"
        from_state = "draft"
        to_state = "published"
        permission = "publish"
        [transitions.metadata]
        message = "Document published"
    "#;

    #[test]
    fn deserialize_definition_with_defaults() {
        let def: WorkflowDefinition = toml::from_str(PUBLICATION).unwrap();
        assert_eq!(def.options.workflow_type, "publication");
        assert_eq!(def.options.name, "Publication");
        assert_eq!(def.options.state_attr, "state");
        assert!(def.options.description.is_empty());
        assert_eq!(def.states.len(), 2);
        assert_eq!(def.states[0].metadata["title"], "Draft");
        assert_eq!(def.transitions[0].permission.as_deref(), Some("publish"));
    }

    #[test]
    fn build_preserves_declaration_order() {
        let def: WorkflowDefinition = toml::from_str(PUBLICATION).unwrap();
        let wf: Workflow<Document, Grants> = def.build(GrantOracle).unwrap();
        let names: Vec<_> = wf.states().map(|s| s.name()).collect();
        assert_eq!(names, vec!["draft", "published"]);
        assert_eq!(wf.find_state("draft").unwrap().title(), "Draft");
        assert_eq!(wf.find_transition("publish").unwrap().permission(), Some("publish"));
    }

    #[test]
    fn build_rejects_dangling_transition() {
        let toml_str = r#"
            type = "broken"
            initial_state = "a"

            [[states]]
            name = "a"

            [[transitions]]
            name = "go"
            from_state = "a"
            to_state = "b"
        "#;
        let def: WorkflowDefinition = toml::from_str(toml_str).unwrap();
        let err = def.build::<Document, ()>(AllowAll).unwrap_err();
        assert!(matches!(err, WorkflowError::DanglingEndpoint { ref state, .. } if state == "b"));
    }

    #[test]
    fn build_rejects_missing_initial_state() {
        let toml_str = r#"
            type = "broken"
            initial_state = "start"

            [[states]]
            name = "a"
        "#;
        let def: WorkflowDefinition = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            def.build::<Document, ()>(AllowAll),
            Err(WorkflowError::UnknownInitialState { .. })
        ));
    }

    #[test]
    fn build_with_attaches_hook_callbacks() {
        let def: WorkflowDefinition = toml::from_str(PUBLICATION).unwrap();
        let wf: Workflow<Document, Grants> = def
            .build_with(GrantOracle, |slot| {
                let message = slot.metadata().get("message")?.as_str()?.to_string();
                Some(callback(move |_: &mut Document, _| Ok(Some(message.clone()))))
            })
            .unwrap();

        assert!(wf.find_state("draft").unwrap().callback().is_none());
        let mut doc = Document::new("doc-1").with_attribute("state", "draft");
        let message = wf
            .transition(&mut doc, &Grants::new(["publish"]), "publish")
            .unwrap();
        assert_eq!(message.as_deref(), Some("Document published"));
        assert_eq!(doc.state("state"), Some("published"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflow.toml");
        std::fs::write(&path, PUBLICATION).unwrap();

        let def = WorkflowDefinition::load(&path).unwrap();
        assert_eq!(def.transitions.len(), 1);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = WorkflowDefinition::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().starts_with("failed to read workflow definition"));
    }

    #[test]
    fn cli_override_wins() {
        let path = definition_path(Some(Path::new("custom.toml")));
        assert_eq!(path, PathBuf::from("custom.toml"));
    }
}
