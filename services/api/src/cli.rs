use crate::demo::{run_demo, run_roster, DemoArgs, RosterArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ta_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "TA Posting Portal",
    about = "Run and demonstrate the TA posting application portal from the command line",
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
    /// Print a posting's applicant roster as CSV
    Roster(RosterArgs),
    /// Run an end-to-end CLI demo covering intake, review, and withdrawal
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Save freshly uploaded documents as session defaults without asking
    #[arg(long)]
    pub(crate) save_defaults: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Roster(args) => run_roster(args),
        Command::Demo(args) => run_demo(args),
    }
}
