use clap::{Args, Subcommand};
use pulse_core::Route;

/// Access level commands.
#[derive(Clone, Debug, Subcommand)]
pub enum LevelCommands {
    /// List access levels.
    List,
    /// Get an access level by ID.
    Get { id: String },
    /// Create an access level.
    Create(LevelCreateArgs),
    /// Update an access level. Only the given fields change.
    Update(LevelUpdateArgs),
    /// Delete an access level. Users holding it become unrestricted.
    Delete { id: String },
}

#[derive(Clone, Debug, Args)]
pub struct LevelCreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Allowed route path (repeatable).
    #[arg(long = "route")]
    pub routes: Vec<Route>,
    /// Grant access to every route.
    #[arg(long)]
    pub admin: bool,
}

#[derive(Clone, Debug, Args)]
pub struct LevelUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
    /// Replace the whitelist with these paths (repeatable).
    #[arg(long = "route", conflicts_with = "clear_routes")]
    pub routes: Vec<Route>,
    /// Replace the whitelist with an empty one.
    #[arg(long)]
    pub clear_routes: bool,
    #[arg(long)]
    pub admin: Option<bool>,
}
