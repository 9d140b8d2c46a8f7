mod cli;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use contentflow::{
    Callback, CallbackSlot, Document, GrantOracle, Grants, Workflow, WorkflowDefinition, callback,
    definition_path,
};
use ui::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let path = definition_path(cli.definition.as_deref());
    let definition = WorkflowDefinition::load(&path)?;
    let workflow: Workflow<Document, Grants> = definition
        .build_with(GrantOracle, message_hook)
        .with_context(|| format!("inconsistent workflow definition {}", path.display()))?;
    let printer = Printer::new();

    match cli.command {
        Command::Check => printer.summary(&workflow),
        Command::States { state, grants } => {
            let probe = Document::new("probe");
            let entries = workflow.get_states(&probe, &Grants::new(grants), state.as_deref());
            printer.states(&entries);
        }
        Command::Transitions { state, grants } => {
            let probe = Document::new("probe");
            let transitions = workflow.get_transitions(&probe, &Grants::new(grants), Some(state.as_str()));
            printer.transitions(&transitions);
        }
        Command::Walk { targets, grants, id } => {
            let grants = Grants::new(grants);
            let mut document = Document::new(id);
            let (state, message) = workflow.initialize(&mut document, Some(&grants))?;
            printer.step(&state, message.as_deref());
            for target in &targets {
                let message = workflow
                    .transition_to_state(&mut document, &grants, target, true)
                    .with_context(|| format!("walk stopped before reaching '{target}'"))?;
                printer.step(target, message.as_deref());
            }
            printer.document(&document);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// States and transitions carrying a `message` metadata entry report it when run.
fn message_hook(slot: CallbackSlot<'_>) -> Option<Callback<Document, Grants>> {
    let message = slot.metadata().get("message")?.as_str()?.to_string();
    Some(callback(move |_: &mut Document, _| Ok(Some(message.clone()))))
}
