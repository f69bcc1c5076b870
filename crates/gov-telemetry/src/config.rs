//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Subsystem identifier ("00" for the whole node)
    pub subsystem_id: String,

    /// Log level filter (trace, debug, info, warn, error or a directive list)
    pub log_level: String,

    /// Whether to write logs to stdout at all
    pub console_output: bool,

    /// Whether to emit JSON lines instead of human-readable output
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "govchain".to_string(),
            subsystem_id: "00".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

fn flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GC_SERVICE_NAME`: Service name (default: govchain)
    /// - `GC_SUBSYSTEM_ID`: Subsystem ID (default: 00)
    /// - `GC_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `GC_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `GC_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();
        let defaults = Self::default();

        Self {
            service_name: env::var("GC_SERVICE_NAME").unwrap_or(defaults.service_name),

            subsystem_id: env::var("GC_SUBSYSTEM_ID").unwrap_or(defaults.subsystem_id),

            log_level: env::var("GC_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            console_output: env::var("GC_CONSOLE_OUTPUT")
                .map(|v| !v.eq_ignore_ascii_case("false") && v != "0")
                .unwrap_or(defaults.console_output),

            json_logs: env::var("GC_JSON_LOGS")
                .map(|v| flag(&v))
                .unwrap_or(is_container),
        }
    }

    /// Get the full service name including subsystem.
    pub fn full_service_name(&self) -> String {
        if self.subsystem_id == "00" {
            self.service_name.clone()
        } else {
            format!("{}-{}", self.service_name, self.subsystem_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "govchain");
        assert_eq!(config.log_level, "info");
        assert!(config.console_output);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_full_service_name() {
        let mut config = TelemetryConfig::default();
        assert_eq!(config.full_service_name(), "govchain");

        config.subsystem_id = "01".to_string();
        assert_eq!(config.full_service_name(), "govchain-01");
    }

    #[test]
    fn test_flag_parsing() {
        assert!(flag("TRUE"));
        assert!(flag("1"));
        assert!(!flag("yes"));
    }
}
