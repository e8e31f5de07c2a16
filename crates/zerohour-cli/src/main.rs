use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "zerohour", version, about = "Countdown-event tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a countdown event
    Add {
        /// Event name
        name: String,
        /// Target date, YYYY-MM-DD (counts down to midnight local time)
        #[arg(long)]
        date: String,
        /// Optional description
        #[arg(long, default_value = "")]
        description: String,
        /// Print the created event as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an active event; omitted fields keep their values
    Edit {
        /// Event id
        id: i64,
        #[arg(long)]
        name: Option<String>,
        /// Target date, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List active events grouped by proximity tier
    List {
        #[arg(long)]
        json: bool,
    },
    /// List past events, most recently archived first
    Past {
        #[arg(long)]
        json: bool,
    },
    /// Show one event in detail
    Show {
        /// Event id
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Schedule a soft delete with an undo window
    Delete {
        /// Event id
        id: i64,
    },
    /// Cancel a pending delete inside the undo window
    Undo {
        /// Event id
        id: i64,
    },
    /// Refresh loop: tick and repaint the board once per interval
    Watch {
        /// Stop after this many repaints (runs forever when omitted)
        #[arg(long)]
        ticks: Option<u64>,
        /// Emit deltas and snapshots as JSON lines instead of a board
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Add {
            name,
            date,
            description,
            json,
        } => commands::add::run(&name, &date, &description, json),
        Commands::Edit {
            id,
            name,
            date,
            description,
            json,
        } => commands::edit::run(id, name, date, description, json),
        Commands::List { json } => commands::list::run(json),
        Commands::Past { json } => commands::past::run(json),
        Commands::Show { id, json } => commands::show::run(id, json),
        Commands::Delete { id } => commands::delete::run(id),
        Commands::Undo { id } => commands::undo::run(id),
        Commands::Watch { ticks, json } => commands::watch::run(ticks, json),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
