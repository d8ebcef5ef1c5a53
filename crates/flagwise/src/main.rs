mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::perf::PerfConfig;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Perf {
            datafile,
            sdk_key,
            flag,
            users,
            prefix,
        } => commands::perf::run(
            &datafile,
            sdk_key.as_deref(),
            &PerfConfig {
                flag_key: flag,
                users,
                prefix,
            },
        ),
        Commands::Decide {
            flag,
            user,
            attributes,
            datafile,
            reasons,
        } => commands::decide::run(&datafile, &flag, &user, attributes, reasons),
        Commands::Inspect { datafile } => commands::inspect::run(&datafile),
        Commands::Version => commands::version::run(),
    }
}
