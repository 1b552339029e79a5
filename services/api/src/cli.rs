use crate::demo::{run_demo, run_roster_import, DemoArgs, RosterImportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use youthbridge::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "YouthBridge Platform",
    about = "Run the youth verification and opportunity matching service from the command line",
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
    /// Bulk onboarding from camp roster exports
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },
    /// Run an end-to-end CLI demo covering verification and applications
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum RosterCommand {
    /// Import a roster CSV and report the registration counts
    Import(RosterImportArgs),
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
        Command::Roster {
            command: RosterCommand::Import(args),
        } => run_roster_import(args),
        Command::Demo(args) => run_demo(args),
    }
}
