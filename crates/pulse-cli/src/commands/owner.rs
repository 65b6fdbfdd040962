use anyhow::Context;
use pulse_access::Bootstrap;
use pulse_core::entities::OrgUser;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::owner::OwnerCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum OwnerStatus {
    Created,
    AlreadyExists,
    /// The roster has users but none of them is the owner.
    NoOwner,
}

#[derive(Debug, Serialize)]
struct OwnerResponse {
    status: OwnerStatus,
    owner: Option<OrgUser>,
}

impl From<Bootstrap> for OwnerResponse {
    fn from(outcome: Bootstrap) -> Self {
        match outcome {
            Bootstrap::Created(owner) => Self {
                status: OwnerStatus::Created,
                owner: Some(owner),
            },
            Bootstrap::Existing(owner) => Self {
                status: OwnerStatus::AlreadyExists,
                owner: Some(owner),
            },
            Bootstrap::NoOwner => Self {
                status: OwnerStatus::NoOwner,
                owner: None,
            },
        }
    }
}

/// Handle `pulse owner`.
pub async fn handle(
    action: &OwnerCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        OwnerCommands::Init { email, name } => {
            let response = init(ctx, email.as_deref(), name.clone()).await?;
            output(&response, flags.format)
        }
    }
}

async fn init(
    ctx: &AppContext,
    email: Option<&str>,
    name: Option<String>,
) -> anyhow::Result<OwnerResponse> {
    let email = email
        .or_else(|| ctx.config.general.owner_email())
        .context("owner init needs --email or general.owner_email")?;
    let outcome = ctx.access.bootstrap_owner(email, name).await?;
    Ok(outcome.into())
}
