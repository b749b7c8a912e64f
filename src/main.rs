use bezel_patcher::cli::{Args, run_cli};
use bezel_patcher::output::OutputFormatter;
use clap::Parser;

fn main() {
    // conflicting or missing arguments exit here, before any file is touched
    let args = Args::parse();

    if let Err(e) = run_cli(&args) {
        OutputFormatter::error(&e);
        std::process::exit(1);
    }
}
