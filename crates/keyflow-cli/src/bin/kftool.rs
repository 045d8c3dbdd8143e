use clap::{Parser, Subcommand};

use keyflow_cli::commands::{candidate_ops, config_ops, layout_ops, replay_ops};

#[derive(Parser)]
#[command(name = "kftool", about = "Keyflow engine diagnostics")]
struct Cli {
    /// Log engine decisions to stderr (RUST_LOG overrides the filter)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a keyboard script against an in-memory document
    Replay {
        /// Path to the script file
        script: String,
        /// Layout TOML file (default: built-in layout)
        #[arg(long)]
        layout: Option<String>,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the pending-space candidates for a caret position
    Candidates {
        /// Text before the caret
        before: String,
        /// Text after the caret
        #[arg(default_value = "")]
        after: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List every key with its hint glyph and long-press options
    Layout {
        /// Layout TOML file (default: built-in layout)
        file: Option<String>,
        /// Show faces as drawn with shift on
        #[arg(long)]
        shift: bool,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Export or validate settings and layouts
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
    /// Export the built-in layout as TOML
    LayoutExport,
    /// Validate a layout TOML file
    LayoutValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn init_logging(verbose: bool) {
    if !verbose {
        return;
    }
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("keyflow=debug")),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Replay {
            script,
            layout,
            json,
        } => replay_ops::replay_cmd(&script, layout.as_deref(), json),
        Command::Candidates {
            before,
            after,
            json,
        } => candidate_ops::candidates_cmd(&before, &after, json),
        Command::Layout { file, shift, json } => {
            layout_ops::layout_cmd(file.as_deref(), shift, json)
        }
        Command::Config { action } => match action {
            ConfigAction::SettingsExport => config_ops::settings_export(),
            ConfigAction::SettingsValidate { file } => config_ops::settings_validate(&file),
            ConfigAction::LayoutExport => config_ops::layout_export(),
            ConfigAction::LayoutValidate { file } => config_ops::layout_validate(&file),
        },
    }
}
