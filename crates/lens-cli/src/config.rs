//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use lens_core::ReconcileConfig;

/// Loads the reconciliation configuration from default locations.
///
/// Layering, lowest to highest precedence: built-in defaults, the TOML file
/// in the platform config directory, an explicitly supplied file, and
/// `LENS_*` environment variables. Per-invocation CLI flags are applied on
/// top by the caller.
#[expect(
    clippy::result_large_err,
    reason = "figment::Error is large but only returned at startup"
)]
pub fn load(config_path: Option<&Path>) -> Result<ReconcileConfig, figment::Error> {
    let mut figment = Figment::from(Serialized::defaults(ReconcileConfig::default()));

    // Load from default config location
    if let Some(config_dir) = dirs_config_path() {
        figment = figment.merge(Toml::file(config_dir.join("config.toml")));
    }

    // Load from specified config file
    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    // Load from environment variables (LENS_*)
    figment = figment.merge(Env::prefixed("LENS_"));

    figment.extract()
}

/// Returns the platform-specific config directory for lens.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("lens"))
}
