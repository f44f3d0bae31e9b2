//! simple-api-example - DuraCloud REST API walkthrough
//!
//! Logs in to a DuraStore host, lists spaces, then adds, lists and deletes
//! one content item in the given space.

use dc_example::commands;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEBUG_DIRECTIVES: &str = "dc_core=debug,dc_rest=debug,dc_example=debug";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match commands::parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(exit_code) => std::process::exit(exit_code.as_i32()),
    };

    // Logs go to stderr so they never mix with the listings on stdout
    let filter = if cli.debug {
        EnvFilter::new(DEBUG_DIRECTIVES)
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
