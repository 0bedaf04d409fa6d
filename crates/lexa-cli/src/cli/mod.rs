//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use lexa_core::config::Config;
use lexa_core::context::AppContext;

mod commands;

#[derive(Parser)]
#[command(name = "lexa")]
#[command(version = "0.2")]
#[command(about = "Lexa legal assistant CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the jurisdiction from config
    #[arg(long, global = true)]
    jurisdiction: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Ask the legal advisor a question
    Advise {
        /// The question to send
        prompt: String,

        /// Use the synchronous endpoint instead of streaming
        #[arg(long)]
        no_stream: bool,
    },

    /// Run the company-formation intake analysis
    Analyze {
        #[command(flatten)]
        answers: commands::analyze::AnswerArgs,

        /// Use the synchronous endpoint instead of streaming
        #[arg(long)]
        no_stream: bool,
    },

    /// Draft a document prefilled from the stored profile
    Draft {
        /// Kind of document (e.g. "statuts", "pacte-associes")
        kind: String,

        /// Extra drafting instructions
        #[arg(long)]
        instructions: Option<String>,

        /// Use the synchronous endpoint instead of streaming
        #[arg(long)]
        no_stream: bool,
    },

    /// Manage the stored user profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Check backend availability
    Health,
}

#[derive(clap::Subcommand)]
enum ProfileCommands {
    /// Print the stored profile
    Show,
    /// Update profile fields
    Set {
        #[command(flatten)]
        fields: commands::profile::FieldArgs,
    },
    /// Restore the default profile
    Reset,
    /// Print the formatted mailing address
    Address,
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
    /// Create a default config file
    Init,
    /// Print a config generated from defaults
    Generate,
    /// Persist the default jurisdiction
    SetJurisdiction {
        /// Jurisdiction code (e.g. "FR", "BE")
        jurisdiction: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = lexa_core::logging::init().context("init logging")?;
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "lexa starting");

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("load config")?;
    if let Some(jurisdiction) = cli.jurisdiction {
        config.jurisdiction = jurisdiction;
    }

    match cli.command {
        Commands::Advise { prompt, no_stream } => {
            let mut ctx = build_context(config)?;
            commands::advise::run(&mut ctx, &prompt, no_stream).await
        }

        Commands::Analyze { answers, no_stream } => {
            let mut ctx = build_context(config)?;
            commands::analyze::run(&mut ctx, answers, no_stream).await
        }

        Commands::Draft {
            kind,
            instructions,
            no_stream,
        } => {
            let mut ctx = build_context(config)?;
            commands::draft::run(&mut ctx, &kind, instructions.as_deref(), no_stream).await
        }

        Commands::Profile { command } => {
            let mut ctx = build_context(config)?;
            match command {
                ProfileCommands::Show => commands::profile::show(&ctx),
                ProfileCommands::Set { fields } => commands::profile::set(&mut ctx, fields),
                ProfileCommands::Reset => commands::profile::reset(&mut ctx),
                ProfileCommands::Address => commands::profile::address(&ctx),
            }
        }

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
            ConfigCommands::SetJurisdiction { jurisdiction } => {
                commands::config::set_jurisdiction(&jurisdiction)
            }
        },

        Commands::Health => commands::health::run(&config).await,
    }
}

/// Builds the application context and restores persisted state.
fn build_context(config: Config) -> Result<AppContext> {
    let mut ctx = AppContext::new(config);
    ctx.hydrate().context("restore profile")?;
    Ok(ctx)
}
