//! bridgegen command-line entry point.

fn main() {
    bridgegen_cli::init_tracing();
    let code = bridgegen_cli::run_cli(std::env::args().collect());
    std::process::exit(code);
}
