use clap::Subcommand;

/// Organization owner commands.
#[derive(Clone, Debug, Subcommand)]
pub enum OwnerCommands {
    /// Create the owner if the roster is empty.
    Init {
        /// Owner email (defaults to general.owner_email).
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
}
