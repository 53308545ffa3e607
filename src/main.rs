use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

use filiere::cli::Cli;

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    // Logging is off unless FILIERE_LOG (or RUST_LOG) asks for it
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FILIERE_LOG")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    filiere::cli::run(cli)
}
