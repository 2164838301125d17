use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "reservations")]
#[command(about = "Restaurant table reservation lifecycle tool")]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "reservations.toml")]
    pub config: String,

    /// Bearer token from `reservations login`
    #[arg(long, env = "RESERVATION_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Exchange credentials for an access token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Print an Argon2id hash for the [[auth.users]] config section
    HashPassword { password: String },
    /// Book a table
    Create(CreateArgs),
    /// Show one reservation
    Get { id: String },
    /// List reservations in storage order
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value = "0")]
        offset: usize,
        #[arg(long, default_value = "50")]
        limit: usize,
    },
    Confirm { id: String },
    AssignTable {
        id: String,
        #[arg(long)]
        table_id: String,
        #[arg(long)]
        capacity: u32,
        #[arg(long)]
        area: String,
    },
    CheckIn { id: String },
    Complete { id: String },
    Cancel {
        id: String,
        #[arg(long)]
        reason_code: String,
        #[arg(long)]
        description: String,
    },
    /// Counts per status and total recorded payments
    Stats,
}

#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub customer_id: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub email: String,
    /// RFC 3339, or YYYY-MM-DDTHH:MM:SS read as UTC
    #[arg(long)]
    pub start: String,
    /// Defaults to reservation.default_duration_minutes
    #[arg(long)]
    pub duration: Option<u32>,
    /// Deposit in minor currency units
    #[arg(long, requires = "deposit_method")]
    pub deposit_amount: Option<i64>,
    #[arg(long, requires = "deposit_amount")]
    pub deposit_method: Option<String>,
}

impl Command {
    /// Commands usable without a token.
    pub fn is_public(&self) -> bool {
        matches!(self, Command::Login { .. } | Command::HashPassword { .. })
    }
}
