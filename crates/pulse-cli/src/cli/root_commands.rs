use clap::Args;

use crate::cli::subcommands::{LevelCommands, OwnerCommands, UserCommands};

/// Top-level command tree.
#[derive(Clone, Debug, clap::Subcommand)]
pub enum Commands {
    /// Access levels.
    Level {
        #[command(subcommand)]
        action: LevelCommands,
    },
    /// Organization users.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Organization owner.
    Owner {
        #[command(subcommand)]
        action: OwnerCommands,
    },
    /// Run the route guard for an identity and path.
    Check(CheckArgs),
    /// Show the resolved access state of an identity.
    Whoami(WhoamiArgs),
}

#[derive(Clone, Debug, Args)]
pub struct CheckArgs {
    /// Identity to evaluate (defaults to general.owner_email).
    #[arg(long)]
    pub email: Option<String>,
    /// Path being navigated to, e.g. `/campanhas`.
    pub path: String,
}

#[derive(Clone, Debug, Args)]
pub struct WhoamiArgs {
    /// Identity to resolve (defaults to general.owner_email).
    #[arg(long)]
    pub email: Option<String>,
}
