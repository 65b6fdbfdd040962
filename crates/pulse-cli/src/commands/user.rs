use anyhow::bail;
use pulse_core::entities::{NewOrgUser, OrgUser};
use pulse_db::updates::org_user::{OrgUserUpdate, OrgUserUpdateBuilder};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::user::{UserCommands, UserInviteArgs, UserUpdateArgs};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RemoveResponse<'a> {
    id: &'a str,
    removed: bool,
}

/// Handle `pulse user`.
pub async fn handle(
    action: &UserCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        UserCommands::List => output(&ctx.access.org_users(), flags.format),
        UserCommands::Invite(args) => invite(args, ctx, flags).await,
        UserCommands::Update(args) => update(args, ctx, flags).await,
        UserCommands::Remove { id } => {
            ctx.access.delete_org_user(id).await?;
            output(&RemoveResponse { id, removed: true }, flags.format)
        }
    }
}

fn find(ctx: &AppContext, id: &str) -> anyhow::Result<OrgUser> {
    match ctx.access.org_users().into_iter().find(|user| user.id == id) {
        Some(user) => Ok(user),
        None => bail!("org user '{id}' not found"),
    }
}

/// Refuse to assign a level the roster does not know about.
fn ensure_level_exists(ctx: &AppContext, level: Option<&str>) -> anyhow::Result<()> {
    if let Some(id) = level
        && ctx.access.roster().access_level(id).is_none()
    {
        bail!("access level '{id}' not found");
    }
    Ok(())
}

async fn invite(args: &UserInviteArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ensure_level_exists(ctx, args.level.as_deref())?;
    let input = NewOrgUser::invite(&args.email)
        .name(args.name.clone())
        .access_level_id(args.level.clone());
    let user = ctx.access.create_org_user(&input).await?;
    output(&user, flags.format)
}

fn build_update(args: &UserUpdateArgs) -> OrgUserUpdate {
    let mut builder = OrgUserUpdateBuilder::new();
    if args.clear_name {
        builder = builder.name(None);
    } else if let Some(name) = &args.name {
        builder = builder.name(Some(name.clone()));
    }
    if args.clear_level {
        builder = builder.access_level_id(None);
    } else if let Some(level) = &args.level {
        builder = builder.access_level_id(Some(level.clone()));
    }
    builder.build()
}

async fn update(args: &UserUpdateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let update = build_update(args);
    if update.is_empty() {
        bail!("user update needs at least one field to change");
    }
    ensure_level_exists(ctx, args.level.as_deref())?;
    ctx.access.update_org_user(&args.id, &update).await?;
    output(&find(ctx, &args.id)?, flags.format)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn args() -> UserUpdateArgs {
        UserUpdateArgs {
            id: "usr-1".into(),
            name: None,
            clear_name: false,
            level: None,
            clear_level: false,
        }
    }

    #[test]
    fn empty_flags_build_empty_update() {
        assert!(build_update(&args()).is_empty());
    }

    #[test]
    fn clear_level_unassigns() {
        let update = build_update(&UserUpdateArgs {
            clear_level: true,
            ..args()
        });
        assert_eq!(update.access_level_id, Some(None));
        assert_eq!(update.name, None);
    }

    #[test]
    fn level_and_name_are_set() {
        let update = build_update(&UserUpdateArgs {
            name: Some("Ana".into()),
            level: Some("acl-1".into()),
            ..args()
        });
        assert_eq!(update.name, Some(Some("Ana".into())));
        assert_eq!(update.access_level_id, Some(Some("acl-1".into())));
    }
}
