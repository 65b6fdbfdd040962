use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Level { action } => commands::level::handle(&action, ctx, flags).await,
        Commands::User { action } => commands::user::handle(&action, ctx, flags).await,
        Commands::Owner { action } => commands::owner::handle(&action, ctx, flags).await,
        Commands::Check(args) => commands::check::handle(&args, ctx, flags),
        Commands::Whoami(args) => commands::whoami::handle(&args, ctx, flags),
    }
}
