use crate::demo::{run_demo, run_simulate, SimulateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use whatif::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "WhatIf",
    about = "Compare Act Now / Delay / Hedge scenarios for a decision, or serve the HTTP API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a decision and print the ranked scenarios
    Simulate(SimulateArgs),
    /// Run the documented demo decision through the service and print the stored run
    Demo,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Simulate(args) => run_simulate(args),
        Command::Demo => run_demo().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["whatif"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn simulate_flags_parse() {
        let cli = Cli::try_parse_from(["whatif", "simulate", "--input", "decision.json", "--json"])
            .expect("parses");
        match cli.command {
            Some(Command::Simulate(args)) => {
                assert_eq!(
                    args.input.as_deref(),
                    Some(std::path::Path::new("decision.json"))
                );
                assert!(args.json);
            }
            other => panic!("expected simulate command, got {other:?}"),
        }
    }

    #[test]
    fn serve_overrides_parse() {
        let cli = Cli::try_parse_from(["whatif", "serve", "--host", "0.0.0.0", "--port", "9000"])
            .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
                assert_eq!(args.port, Some(9000));
            }
            other => panic!("expected serve command, got {other:?}"),
        }
    }
}
