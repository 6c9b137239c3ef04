//! Runtime configuration for a Realfin app.

/// Top-level configuration for [`App`](super::App).
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Human-readable prefix for account addresses.
    pub hrp: String,
    /// Address allowed to update module parameters. When absent, the app
    /// derives the `gov` module account for the configured prefix.
    pub authority: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            hrp: "rf".to_string(),
            authority: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_config_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.hrp, "rf");
        assert!(config.authority.is_none());
    }
}
