//! Integration tests for TOML and environment configuration loading.
//!
//! Uses `figment::Jail` for sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use pulse_config::{LoadFailurePolicy, PulseConfig};

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[turso]
url = "libsql://pulse-agencia.turso.io"
auth_token = "turso-token"

[access]
load_failure_policy = "fail_closed"

[general]
owner_email = "dona@agencia.com"
"#,
        )?;

        let config: PulseConfig = Figment::from(Serialized::defaults(PulseConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.turso.url, "libsql://pulse-agencia.turso.io");
        assert_eq!(config.turso.auth_token, "turso-token");
        assert!(config.turso.is_configured());
        assert_eq!(
            config.access.load_failure_policy,
            LoadFailurePolicy::FailClosed
        );
        assert_eq!(config.general.owner_email(), Some("dona@agencia.com"));
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".pulse")?;
        jail.create_file(
            ".pulse/config.toml",
            r#"
[turso]
local_path = "./pulse.db"
"#,
        )?;

        let config: PulseConfig = PulseConfig::figment().extract()?;
        assert_eq!(config.turso.local_path, "./pulse.db");
        assert!(config.turso.has_local_path());
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".pulse")?;
        jail.create_file(
            ".pulse/config.toml",
            r#"
[turso]
url = "libsql://from-toml.turso.io"
"#,
        )?;
        jail.set_env("PULSE_TURSO__URL", "libsql://from-env.turso.io");
        jail.set_env("PULSE_ACCESS__LOAD_FAILURE_POLICY", "fail_closed");

        let config: PulseConfig = PulseConfig::figment().extract()?;
        assert_eq!(config.turso.url, "libsql://from-env.turso.io");
        assert_eq!(
            config.access.load_failure_policy,
            LoadFailurePolicy::FailClosed
        );
        Ok(())
    });
}

#[test]
fn unknown_policy_is_an_error() {
    Jail::expect_with(|jail| {
        jail.set_env("PULSE_ACCESS__LOAD_FAILURE_POLICY", "fail_sideways");

        let result: Result<PulseConfig, _> =
            Figment::from(Serialized::defaults(PulseConfig::default()))
                .merge(Env::prefixed("PULSE_").split("__"))
                .extract();
        assert!(result.is_err());
        Ok(())
    });
}
