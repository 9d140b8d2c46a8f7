//! Interface de linha de comando do contentflow baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (check, states,
//! transitions, walk) e flags globais (--definition, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// contentflow: motor de máquina de estados para o ciclo de vida de conteúdo.
#[derive(Debug, Parser)]
#[command(name = "contentflow", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Arquivo TOML com a definição do workflow.
    #[arg(long, short, global = true)]
    pub definition: Option<PathBuf>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verifica a consistência da definição do workflow.
    Check,

    /// Lista os estados e as transições visíveis a partir de cada um.
    States {
        /// Estado tratado como atual.
        #[arg(long)]
        state: Option<String>,

        /// Permissão concedida ao chamador (pode ser repetida).
        #[arg(long = "grant")]
        grants: Vec<String>,
    },

    /// Lista as transições permitidas a partir de um estado.
    Transitions {
        /// Estado de origem.
        #[arg(long)]
        state: String,

        /// Permissão concedida ao chamador (pode ser repetida).
        #[arg(long = "grant")]
        grants: Vec<String>,
    },

    /// Inicializa um documento e o leva por cada estado informado, em ordem.
    Walk {
        /// Estados de destino.
        #[arg(required = true)]
        targets: Vec<String>,

        /// Permissão concedida ao chamador (pode ser repetida).
        #[arg(long = "grant")]
        grants: Vec<String>,

        /// Identificador do documento simulado.
        #[arg(long, default_value = "doc-1")]
        id: String,
    },
}
