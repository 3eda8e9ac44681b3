//! Config commands.

use std::path::Path;

use tracing::info;

use crate::cli::{config_path, output, ConfigAction};
use crate::core::cipher::MasterKey;
use crate::core::config::Config;
use crate::core::constants::{KEY_ENV, LEGACY_KEY_ENV};
use crate::core::hangar::Hangar;
use crate::error::Result;

pub fn execute(explicit: Option<&Path>, action: ConfigAction) -> Result<()> {
    let path = config_path(explicit)?;

    match action {
        ConfigAction::Init => {
            let config = Hangar::init(&path)?;
            info!(path = %path.display(), "config initialized");
            output::success(&format!("wrote {}", output::path(&path)));
            output::kv("store", config.store_path(&path).display());

            let has_key = std::env::var(KEY_ENV).is_ok() || std::env::var(LEGACY_KEY_ENV).is_ok();
            if !has_key {
                let key = MasterKey::generate();
                output::blank();
                output::warn("no encryption key set; generated one, store it safely:");
                output::data(&format!("export {}={}", KEY_ENV, key.to_hex().as_str()));
            }
        }
        ConfigAction::Show => {
            let config = Config::load(&path)?;
            output::header("Configuration");
            output::rule();
            output::kv("file", output::path(&path));
            output::kv("version", &config.hangar.version);
            output::kv("store", config.store_path(&path).display());
            output::kv("timeout", format!("{}s", config.dispatch.timeout_secs));
            output::kv("retention", config.policy.identity_retention);
            match MasterKey::from_env() {
                Ok(key) => output::kv("key", key.fingerprint()),
                Err(_) => output::kv("key", output::faint("not set")),
            }
        }
    }

    Ok(())
}
