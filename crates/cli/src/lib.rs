//! Command-line front end of the bridge generator.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod diff;
pub mod generate;
pub mod inspect;

#[derive(Parser, Debug)]
#[command(
    name = "bridgegen",
    version,
    about = "Generate callback bridges between a native SDK and the bridgegen runtime"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate bridge code from an API description
    Generate(generate::GenerateArgs),
    /// Show what would be generated, including unsupported fields
    Inspect(inspect::InspectArgs),
}

/// Parse `args` (program name first) and run the selected command.
pub fn run_cli(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Generate(args)) => generate::run(&args),
            Some(Commands::Inspect(args)) => inspect::run(&args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Map a command result to a process exit code, reporting the error on stderr.
pub(crate) fn run_command(f: impl FnOnce() -> Result<(), String>) -> i32 {
    match f() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// Install the stderr log subscriber.
///
/// BRIDGEGEN_LOG takes a plain level ("debug") applied to every bridgegen
/// crate, or a full filter spec like "bridgegen_core=trace".
pub fn init_tracing() {
    let filter = match std::env::var("BRIDGEGEN_LOG") {
        Ok(level) if is_plain_level(&level) => format!("bridgegen={level}"),
        Ok(spec) => spec,
        Err(_) => "bridgegen=info".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_levels() {
        assert!(is_plain_level("debug"));
        assert!(is_plain_level("WARN"));
        assert!(!is_plain_level("bridgegen_core=trace"));
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "bridgegen",
            "generate",
            "--api",
            "steam_api.json",
            "--backend",
            "manifest",
            "--out",
            "bridge.json",
            "--check",
        ])
        .unwrap();
        let Some(Commands::Generate(args)) = cli.command else {
            unreachable!("generate subcommand expected");
        };
        assert_eq!(args.backend, bridgegen_core::BackendKind::Manifest);
        assert!(args.check);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_check_requires_out() {
        let err = Cli::try_parse_from(["bridgegen", "generate", "--api", "a.json", "--check"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_unknown_command_exit_code() {
        assert_eq!(run_cli(vec!["bridgegen".into(), "frobnicate".into()]), 2);
    }
}
