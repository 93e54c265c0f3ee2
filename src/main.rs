mod commands;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use dotenv::dotenv;
use sesplan_client::config::ClientConfig;
use sesplan_core::availability::selection::SelectionIntent;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "sesplan")]
#[command(about = "Plan tabletop sessions and declare when you are free to play")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the token
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List sessions of a campaign, or all of your sessions
    Sessions {
        #[arg(short, long)]
        campaign: Option<i64>,
    },
    /// List the time slots of a session
    Slots {
        #[arg(short, long)]
        session: i64,
    },
    /// Show the availability grid of a session
    Grid {
        #[arg(short, long)]
        session: i64,
    },
    /// Mark yourself available for a range of cells (yyyy-MM-dd-HH:mm)
    Mark(RangeArgs),
    /// Remove your availability for a range of cells (yyyy-MM-dd-HH:mm)
    Unmark(RangeArgs),
    /// Show your session-wide availability
    Mine {
        #[arg(short, long)]
        session: i64,
    },
    /// Toggle cells (yyyy-MM-dd-HH:mm) in your session-wide availability and save it
    Toggle {
        #[arg(short, long)]
        session: i64,

        #[arg(required = true)]
        cells: Vec<String>,
    },
    /// Delete your session-wide availability
    ClearMine {
        #[arg(short, long)]
        session: i64,
    },
}

#[derive(Args, Debug, PartialEq)]
struct RangeArgs {
    #[arg(short, long)]
    session: i64,

    #[arg(long)]
    from: String,

    #[arg(long)]
    to: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ClientConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Login { username, password } => commands::login(config, username, password).await,
        Commands::Logout => commands::logout(config).await,
        Commands::Whoami => commands::whoami(config).await,
        Commands::Sessions { campaign } => commands::sessions(config, campaign).await,
        Commands::Slots { session } => commands::slots(config, session).await,
        Commands::Grid { session } => commands::grid(config, session).await,
        Commands::Mark(range) => {
            commands::mark(config, range.session, &range.from, &range.to, SelectionIntent::Add).await
        }
        Commands::Unmark(range) => {
            commands::mark(config, range.session, &range.from, &range.to, SelectionIntent::Remove).await
        }
        Commands::Mine { session } => commands::mine(config, session).await,
        Commands::Toggle { session, cells } => commands::toggle(config, session, &cells).await,
        Commands::ClearMine { session } => commands::clear_mine(config, session).await,
    }
}
