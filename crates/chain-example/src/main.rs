//! `calc`: a small calculator wired through a cmdchain handler chain.
//!
//! The binary stays thin: clap parses the arguments, `cli::run` builds the
//! chain and dispatches, and this file only handles process exit.

mod cli;

fn main() {
    cli::init_tracing();

    if let Err(e) = cli::run(std::env::args_os()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
