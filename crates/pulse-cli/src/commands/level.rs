use anyhow::bail;
use pulse_core::entities::{AccessLevel, NewAccessLevel};
use pulse_db::updates::access_level::{AccessLevelUpdate, AccessLevelUpdateBuilder};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::level::{LevelCommands, LevelCreateArgs, LevelUpdateArgs};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DeleteResponse<'a> {
    id: &'a str,
    deleted: bool,
    /// Users still pointing at the deleted level; they are now unrestricted.
    orphaned_users: Vec<String>,
}

/// Handle `pulse level`.
pub async fn handle(
    action: &LevelCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        LevelCommands::List => output(&ctx.access.access_levels(), flags.format),
        LevelCommands::Get { id } => output(&find(ctx, id)?, flags.format),
        LevelCommands::Create(args) => create(args, ctx, flags).await,
        LevelCommands::Update(args) => update(args, ctx, flags).await,
        LevelCommands::Delete { id } => delete(id, ctx, flags).await,
    }
}

fn find(ctx: &AppContext, id: &str) -> anyhow::Result<AccessLevel> {
    match ctx.access.roster().access_level(id) {
        Some(level) => Ok(level.clone()),
        None => bail!("access level '{id}' not found"),
    }
}

async fn create(args: &LevelCreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut input = NewAccessLevel::new(&args.name)
        .routes(args.routes.iter().copied())
        .admin(args.admin);
    if let Some(description) = &args.description {
        input = input.description(description);
    }
    let level = ctx.access.create_access_level(&input).await?;
    output(&level, flags.format)
}

fn build_update(args: &LevelUpdateArgs) -> AccessLevelUpdate {
    let mut builder = AccessLevelUpdateBuilder::new();
    if let Some(name) = &args.name {
        builder = builder.name(name);
    }
    if args.clear_description {
        builder = builder.description(None);
    } else if let Some(description) = &args.description {
        builder = builder.description(Some(description.clone()));
    }
    if args.clear_routes || !args.routes.is_empty() {
        builder = builder.allowed_routes(args.routes.iter().copied());
    }
    if let Some(admin) = args.admin {
        builder = builder.is_admin(admin);
    }
    builder.build()
}

async fn update(args: &LevelUpdateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let update = build_update(args);
    if update.is_empty() {
        bail!("level update needs at least one field to change");
    }
    ctx.access.update_access_level(&args.id, &update).await?;
    output(&find(ctx, &args.id)?, flags.format)
}

async fn delete(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.access.delete_access_level(id).await?;
    let orphaned_users = ctx
        .access
        .org_users()
        .into_iter()
        .filter(|user| user.access_level_id.as_deref() == Some(id))
        .map(|user| user.email)
        .collect::<Vec<_>>();
    if !orphaned_users.is_empty() {
        tracing::warn!(
            id,
            count = orphaned_users.len(),
            "deleted access level is still assigned; those users are now unrestricted"
        );
    }
    output(
        &DeleteResponse {
            id,
            deleted: true,
            orphaned_users,
        },
        flags.format,
    )
}
