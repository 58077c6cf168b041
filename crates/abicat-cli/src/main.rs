use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

/// Inspect and self-test the abicat native C-ABI catalogue.
///
/// The catalogue is a fixed set of exported C functions, each exercising one
/// marshalling pattern a binding generator must get right. This CLI lists the
/// symbols, writes a matching C header, reports struct layouts, and runs
/// every boundary property as a self-test.
///
/// EXAMPLES:
///     abicat symbols               List exported symbols
///     abicat header -o abicat.h    Write the C header
///     abicat layout --json         Struct layouts as JSON
///     abicat selftest              Run boundary probes
///
/// ENVIRONMENT VARIABLES:
///     ABICAT_JSON       Set to '1', 'true' or 'json' for JSON output by default
///     ABICAT_LOG        Log filter (e.g. 'debug', 'abicat_native=trace')
///     NO_COLOR          Set to disable colored output
#[derive(Parser)]
#[command(name = "abicat")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose logging (debug level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every exported function and data symbol
    ///
    /// Shows the C prototype of each boundary function grouped by pattern,
    /// with the release function for every result the caller owns.
    ///
    /// EXAMPLES:
    ///     abicat symbols            Table view
    ///     abicat symbols --json     Full catalogue as JSON
    #[command(visible_alias = "s")]
    Symbols {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Generate a C header for the catalogue
    ///
    /// Reads the [header] section of abicat.toml (or --config) for the
    /// include guard, banner and whether to emit release prototypes.
    ///
    /// EXAMPLES:
    ///     abicat header                      Print to stdout
    ///     abicat header -o include/abicat.h  Write to a file
    ///     abicat header --config ci.toml     Use another config file
    Header {
        /// Path to configuration file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print struct sizes, alignments and field offsets
    ///
    /// EXAMPLES:
    ///     abicat layout
    ///     abicat layout --json
    #[command(visible_alias = "l")]
    Layout {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Run every boundary property through the safe bindings
    ///
    /// Exits non-zero if any probe fails.
    ///
    /// EXAMPLES:
    ///     abicat selftest
    ///     abicat selftest --json
    #[command(visible_alias = "t")]
    Selftest {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     abicat completions bash > ~/.bash_completions/abicat.bash
    ///     abicat completions zsh > ~/.zfunc/_abicat
    ///     abicat completions fish > ~/.config/fish/completions/abicat.fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: bool, cli_config: &config::Config) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        cli_config
            .log_filter
            .as_deref()
            .and_then(|directive| EnvFilter::try_new(directive).ok())
            .unwrap_or_else(|| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(!cli_config.no_color)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cli_config = config::Config::from_env();

    init_tracing(cli.verbose, &cli_config);
    if cli_config.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Symbols { json } => {
            // Command-line flag overrides environment variable
            commands::symbols::run(json || cli_config.default_json)?;
        }
        Commands::Header { config, output } => {
            commands::header::run(config.as_deref(), output.as_deref())?;
        }
        Commands::Layout { json } => {
            commands::layout::run(json || cli_config.default_json)?;
        }
        Commands::Selftest { json } => {
            commands::selftest::run(json || cli_config.default_json)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "abicat", &mut io::stdout());
        }
    }

    Ok(())
}
