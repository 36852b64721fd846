use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use bridgegen_core::{load_config, read_description, BackendKind};
use clap::Args;
use tracing::info;

use crate::diff::render_diff;
use crate::run_command;

/// Arguments of `bridgegen generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Native SDK API description (JSON)
    #[arg(long, value_name = "JSON")]
    pub api: PathBuf,
    /// Generator configuration (TOML); defaults apply when omitted
    #[arg(long, value_name = "TOML")]
    pub config: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = BackendKind::Rust)]
    pub backend: BackendKind,
    /// Output file; stdout when omitted
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
    /// Compare with --out instead of writing it, failing when it is stale
    #[arg(long, requires = "out")]
    pub check: bool,
}

/// Run `generate`, returning the process exit code.
pub fn run(args: &GenerateArgs) -> i32 {
    run_command(|| generate(args))
}

fn generate(args: &GenerateArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref()).map_err(|e| e.to_string())?;
    let description = read_description(&args.api).map_err(|e| e.to_string())?;
    let output =
        bridgegen_core::generate(&description, &config, args.backend).map_err(|e| e.to_string())?;

    match (&args.out, args.check) {
        (Some(out), true) => check(out, &output),
        (Some(out), false) => write(out, &output),
        (None, _) => {
            print!("{output}");
            Ok(())
        }
    }
}

/// Fail with a diff when `path` does not hold exactly `generated`.
fn check(path: &Path, generated: &str) -> Result<(), String> {
    let existing = fs::read_to_string(path).map_err(|e| {
        format!(
            "Failed to read {}: {e}. Run without --check to create it.",
            path.display()
        )
    })?;

    if existing == generated {
        info!(path = %path.display(), "Bridge is up to date.");
        return Ok(());
    }

    let label = path.display().to_string();
    eprint!(
        "{}",
        render_diff(&label, &existing, generated, std::io::stderr().is_terminal())
    );
    Err(format!(
        "{} is out of date. Run without --check to regenerate it.",
        path.display()
    ))
}

/// Write `generated` to `path`, leaving an identical file untouched.
fn write(path: &Path, generated: &str) -> Result<(), String> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == generated) {
        info!(path = %path.display(), "Bridge unchanged.");
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
    }
    fs::write(path, generated).map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
    info!(path = %path.display(), bytes = generated.len(), "Wrote bridge.");
    Ok(())
}
