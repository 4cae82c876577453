use std::env;

use serde::Deserialize;

/// Top-level featureflags.toml configuration
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct AdminConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Register the gRPC server reflection service.
    #[serde(default = "default_reflection")]
    pub reflection: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Any `EnvFilter` directive, e.g. `info` or `featureflags_server=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

// ── Default value functions ──────────────────────────

fn default_hostname() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    50051
}

fn default_reflection() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            port: default_port(),
            reflection: default_reflection(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl AdminConfig {
    /// Load configuration from a TOML file, falling back to defaults if the file
    /// doesn't exist or cannot be parsed.
    ///
    /// Runs before logging is set up, so problems go to stderr.
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                eprintln!("Warning: failed to parse {}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply `FF_*` environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("FF_HOSTNAME") {
            self.server.hostname = val;
        }

        if let Some(val) = var("FF_PORT") {
            match val.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => eprintln!("Warning: invalid FF_PORT value: {}", val),
            }
        }

        if let Some(val) = var("FF_REFLECTION") {
            match parse_bool(&val) {
                Some(enabled) => self.server.reflection = enabled,
                None => eprintln!("Warning: invalid FF_REFLECTION value: {}", val),
            }
        }

        if let Some(val) = var("FF_LOG_LEVEL") {
            self.logging.level = val;
        }

        if let Some(val) = var("FF_LOG_FORMAT") {
            match val.to_lowercase().as_str() {
                "pretty" => self.logging.format = LogFormat::Pretty,
                "json" => self.logging.format = LogFormat::Json,
                other => eprintln!("Warning: unknown FF_LOG_FORMAT value: {}", other),
            }
        }
    }
}
