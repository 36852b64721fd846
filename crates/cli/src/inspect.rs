use std::fmt::Write as _;
use std::path::PathBuf;

use bridgegen_core::{build_ir, load_config, read_description, BridgeIR, StructIR};
use clap::Args;

use crate::run_command;

/// Arguments of `bridgegen inspect`.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Native SDK API description (JSON)
    #[arg(long, value_name = "JSON")]
    pub api: PathBuf,
    /// Generator configuration (TOML)
    #[arg(long, value_name = "TOML")]
    pub config: Option<PathBuf>,
}

/// Run `inspect`, returning the process exit code.
pub fn run(args: &InspectArgs) -> i32 {
    run_command(|| {
        let config = load_config(args.config.as_deref()).map_err(|e| e.to_string())?;
        let description = read_description(&args.api).map_err(|e| e.to_string())?;
        let ir = build_ir(&description, &config).map_err(|e| e.to_string())?;
        print!("{}", render_report(&ir));
        Ok(())
    })
}

/// Human-readable summary of what a generation run would emit.
pub fn render_report(ir: &BridgeIR) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "API description {}: {} catalogued structs",
        ir.source_digest, ir.catalog_size
    );

    let _ = writeln!(out, "\nOne-shot results ({}):", ir.one_shot.len());
    for s in &ir.one_shot {
        let _ = writeln!(out, "  {}  register_{}", s.name, s.ident);
        write_struct_details(&mut out, s);
    }

    let _ = writeln!(out, "\nBroadcasts ({}):", ir.broadcasts.len());
    for s in &ir.broadcasts {
        let _ = writeln!(
            out,
            "  {}  -> {}",
            s.name,
            s.event_name.as_deref().unwrap_or_default()
        );
        write_struct_details(&mut out, s);
    }

    let dropped: usize = ir.structs().map(|s| s.dropped.len()).sum();
    if dropped > 0 {
        let _ = writeln!(
            out,
            "\n{dropped} unsupported field(s); add a field_overrides entry to convert them."
        );
    }
    out
}

fn write_struct_details(out: &mut String, s: &StructIR) {
    let _ = writeln!(out, "    keys: {}", s.delivered_keys().join(", "));
    for dropped in &s.dropped {
        let _ = writeln!(
            out,
            "    dropped: {} ({})",
            dropped.field_name, dropped.native_type
        );
    }
}
