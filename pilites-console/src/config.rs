//! Console client configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the console client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Controller connection.
    pub server: ServerConfig,
    /// Realtime session behaviour.
    pub session: SessionConfig,
    /// Strip rendering.
    pub display: DisplayConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Controller connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Controller origin, e.g. `http://pilites.local:8000`.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

/// Realtime sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Wait before reopening a closed push channel.
    pub reconnect_delay_ms: u64,
}

/// Strip rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Characters used for one full strand.
    pub strip_width: u16,
    /// Emit ANSI colors.
    pub color: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
            request_timeout_ms: 5000,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: 2000,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            strip_width: 60,
            color: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Accessors ────────────────────────────────────────────────────

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl SessionConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl ConsoleConfig {
    /// Load from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// The default configuration as pretty TOML.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&Self::default())
    }

    /// Write default config to a file.
    pub fn write_default(path: &Path) -> std::io::Result<()> {
        let text = Self::default_toml().map_err(std::io::Error::other)?;
        std::fs::write(path, text)
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let text = ConsoleConfig::default_toml().unwrap();
        assert!(text.contains("base_url"));
        assert!(text.contains("reconnect_delay_ms"));
        assert!(text.contains("strip_width"));
    }

    #[test]
    fn roundtrip_config() {
        let text = ConsoleConfig::default_toml().unwrap();
        let parsed = ConsoleConfig::parse(&text).unwrap();
        assert_eq!(parsed.server.base_url, "http://127.0.0.1:8000");
        assert_eq!(parsed.session.reconnect_delay(), Duration::from_secs(2));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let parsed = ConsoleConfig::parse(
            r#"
            [server]
            base_url = "http://pilites.local:8000"

            [display]
            color = false
            "#,
        )
        .unwrap();
        assert_eq!(parsed.server.base_url, "http://pilites.local:8000");
        assert_eq!(parsed.server.request_timeout_ms, 5000);
        assert!(!parsed.display.color);
        assert_eq!(parsed.display.strip_width, 60);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn missing_file_falls_back() {
        let cfg = ConsoleConfig::load(Path::new("/nonexistent/pilites-console.toml"));
        assert_eq!(cfg.session.reconnect_delay_ms, 2000);
    }
}
