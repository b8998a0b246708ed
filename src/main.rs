//! recipe2unit CLI — component recipe to systemd unit.

use clap::Parser;

fn main() {
    recipe2unit::cli::init_logging();
    let args = recipe2unit::cli::Args::parse();
    if let Err(e) = recipe2unit::cli::dispatch(args) {
        let code = recipe2unit::cli::report_failure(&e);
        eprintln!("error: {}", e);
        std::process::exit(code);
    }
}
