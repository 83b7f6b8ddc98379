// Store configuration

use serde::Deserialize;

/// Environment variable that turns lifecycle hooks on by default.
pub const HOOKS_ENV_VAR: &str = "INLINE_QUEUE_HOOKS";

/// Queue store configuration
///
/// Can be embedded in a caller's own config file (every field has a default)
/// or read from the environment with [`StoreConfig::from_env`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Whether lifecycle hooks fire on enqueue and execution.
    ///
    /// Off by default so simple tests stay hook-free. `reset` restores the
    /// store's toggle to this value.
    pub hooks_enabled: bool,
}

impl StoreConfig {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let hooks_enabled = std::env::var(HOOKS_ENV_VAR)
            .ok()
            .map(|raw| parse_flag(&raw))
            .unwrap_or(false);

        Self { hooks_enabled }
    }

    pub fn with_hooks(mut self, enabled: bool) -> Self {
        self.hooks_enabled = enabled;
        self
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
