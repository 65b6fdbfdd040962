use clap::{Args, Subcommand};

/// Organization user commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// List org users.
    List,
    /// Add a user to the roster.
    Invite(UserInviteArgs),
    /// Update an org user. Only the given fields change.
    Update(UserUpdateArgs),
    /// Remove an org user from the roster.
    Remove { id: String },
}

#[derive(Clone, Debug, Args)]
pub struct UserInviteArgs {
    pub email: String,
    #[arg(long)]
    pub name: Option<String>,
    /// Access level ID to assign.
    #[arg(long)]
    pub level: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct UserUpdateArgs {
    pub id: String,
    #[arg(long, conflicts_with = "clear_name")]
    pub name: Option<String>,
    #[arg(long)]
    pub clear_name: bool,
    #[arg(long, conflicts_with = "clear_level")]
    pub level: Option<String>,
    /// Unassign the access level (the user becomes unrestricted).
    #[arg(long)]
    pub clear_level: bool,
}
