use pulse_config::PulseConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &PulseConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &PulseConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.turso.is_configured()
        && !config.turso.has_local_path()
        && has_env_prefix(&env_keys, "PULSE_TURSO")
    {
        warnings.push(
            "Turso config appears default while PULSE_TURSO* env vars exist. Use double underscores (example: PULSE_TURSO__URL)."
                .to_string(),
        );
    }

    if !config.turso.url.is_empty() && config.turso.auth_token.is_empty() {
        warnings.push(
            "turso.url is set without turso.auth_token; using the local roster database instead."
                .to_string(),
        );
    }

    if config.general.owner_email().is_none() && has_env_prefix(&env_keys, "PULSE_GENERAL") {
        warnings.push(
            "general.owner_email appears default while PULSE_GENERAL* env vars exist. Use double underscores (example: PULSE_GENERAL__OWNER_EMAIL)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
