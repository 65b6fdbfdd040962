use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use pulse_access::AccessContext;
use pulse_config::PulseConfig;
use pulse_core::identity::{AuthIdentity, AuthStatus};
use pulse_db::PulseDb;

use crate::cli::GlobalFlags;

/// Default local roster database, relative to the working directory.
const DEFAULT_DB_PATH: &str = ".pulse/pulse.db";

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub access: AccessContext,
    pub config: PulseConfig,
}

impl AppContext {
    /// Open the roster database and load the access engine.
    ///
    /// Resolution order: `--database`, remote Turso when configured,
    /// `turso.local_path`, then `.pulse/pulse.db`. A configured remote that
    /// cannot be opened is an error; the local file is not a replica of it.
    pub async fn init(config: PulseConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let db = open_database(&config, flags.database.as_deref()).await?;
        let access =
            AccessContext::provide(Arc::new(db), &config.access, AuthStatus::SignedOut).await;
        if let Some(error) = access.error() {
            tracing::warn!(%error, "access roster did not load; continuing with an empty roster");
        }
        Ok(Self { access, config })
    }

    /// Sign the engine in as `email`, or as the configured owner email.
    ///
    /// With neither available the engine stays signed out, which resolves
    /// to no current user.
    pub fn sign_in(&self, email: Option<&str>) -> Option<String> {
        let email = email
            .or_else(|| self.config.general.owner_email())
            .map(str::to_string);
        let status = email.as_ref().map_or(AuthStatus::SignedOut, |email| {
            AuthStatus::SignedIn(AuthIdentity::new(format!("cli:{email}"), email.as_str()))
        });
        self.access.set_auth(status);
        email
    }
}

async fn open_database(config: &PulseConfig, database: Option<&str>) -> anyhow::Result<PulseDb> {
    if let Some(path) = database {
        return open_local(Path::new(path)).await;
    }

    if config.turso.is_configured() {
        return PulseDb::open_remote(&config.turso.url, &config.turso.auth_token)
            .await
            .with_context(|| {
                format!("failed to open remote roster database at {}", config.turso.url)
            });
    }

    let path = if config.turso.has_local_path() {
        PathBuf::from(&config.turso.local_path)
    } else {
        PathBuf::from(DEFAULT_DB_PATH)
    };
    open_local(&path).await
}

async fn open_local(path: &Path) -> anyhow::Result<PulseDb> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let path_str = path.to_string_lossy();
    PulseDb::open_local(&path_str)
        .await
        .with_context(|| format!("failed to open roster database at {}", path.display()))
}
