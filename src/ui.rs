//! Saída de terminal do contentflow com mensagens coloridas.
//!
//! Usa a crate `console` para estilização. O [`Printer`] formata o resumo
//! do workflow, a listagem de estados e transições e os passos de um `walk`.

use console::Style;

use contentflow::{Document, Grants, StateEntry, Transition, Workflow};

/// Formatação colorida das respostas da CLI.
pub struct Printer {
    // Estilo verde para sucesso e estado atual.
    green: Style,
    // Estilo amarelo para estado inicial.
    yellow: Style,
    // Estilo esmaecido para detalhes secundários.
    dim: Style,
    // Estilo em negrito para títulos.
    bold: Style,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            green: Style::new().green().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
            bold: Style::new().bold(),
        }
    }

    /// Resumo exibido por `check`.
    pub fn summary(&self, workflow: &Workflow<Document, Grants>) {
        println!(
            "  {} Workflow '{}' ({}) is consistent",
            self.green.apply_to("✓"),
            workflow.name(),
            workflow.workflow_type()
        );
        if !workflow.description().is_empty() {
            println!("    {}", self.dim.apply_to(workflow.description()));
        }
        println!(
            "    {} states, {} transitions, initial state '{}', stored in '{}'",
            workflow.states().count(),
            workflow.transitions().count(),
            workflow.initial_state(),
            workflow.state_attr()
        );
    }

    /// Uma linha por estado, seguida das transições visíveis a partir dele.
    pub fn states(&self, entries: &[StateEntry<'_, Document, Grants>]) {
        for entry in entries {
            let marker = if entry.current {
                self.green.apply_to("●").to_string()
            } else {
                " ".to_string()
            };
            let initial = if entry.initial {
                self.yellow.apply_to(" (initial)").to_string()
            } else {
                String::new()
            };
            println!(
                "{marker} {} {}{initial}",
                self.bold.apply_to(entry.title),
                self.dim.apply_to(format!("[{}]", entry.name()))
            );
            for transition in &entry.transitions {
                self.transition_line(transition);
            }
        }
    }

    pub fn transitions(&self, transitions: &[&Transition<Document, Grants>]) {
        if transitions.is_empty() {
            println!("  {}", self.dim.apply_to("no permitted transitions"));
        }
        for transition in transitions {
            self.transition_line(transition);
        }
    }

    fn transition_line(&self, transition: &Transition<Document, Grants>) {
        let permission = transition
            .permission()
            .map(|p| format!(" requires '{p}'"))
            .unwrap_or_default();
        println!(
            "    → {} ({} → {}){}",
            transition.name(),
            transition.from_state(),
            transition.to_state(),
            self.dim.apply_to(permission)
        );
    }

    /// Um passo de `walk`: o estado alcançado e a mensagem do callback.
    pub fn step(&self, state: &str, message: Option<&str>) {
        match message {
            Some(message) => println!("  {} {state}: {message}", self.green.apply_to("✓")),
            None => println!("  {} {state}", self.green.apply_to("✓")),
        }
    }

    /// Imprime o documento final formatado em JSON.
    pub fn document(&self, document: &Document) {
        println!();
        println!("{}", self.bold.apply_to("─── Document ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(document).unwrap_or_default()
        );
    }
}
