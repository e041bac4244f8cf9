//! Runtime settings resolved from the environment, with optional `.env` support.

use std::env;
use std::fmt;
use std::path::Path;

pub const DEFAULT_DATABASE_HOST: &str = "localhost";
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Resolved connection and environment settings for the scoring side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_host: String,
    pub database_user: String,
    pub database_password: String,
    pub database_name: String,
    pub port: String,
    pub environment: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    /// Loads `.env` from the working directory if present, then reads the process environment.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment overrides from {:?}", path);
        }
        Self::from_process_env()
    }

    /// Loads a specific dotenv file before reading the process environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> Self {
        if let Err(e) = dotenvy::from_path(path.as_ref()) {
            log::warn!("Could not load {:?}: {}", path.as_ref(), e);
        }
        Self::from_process_env()
    }

    fn from_process_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves settings from any key lookup. Missing and empty values take the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            database_host: get("DATABASE_HOST", DEFAULT_DATABASE_HOST),
            database_user: get("DATABASE_USER", ""),
            database_password: get("DATABASE_PASSWORD", ""),
            database_name: get("DATABASE_NAME", ""),
            port: get("PORT", ""),
            environment: get("ENV", DEFAULT_ENVIRONMENT),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.database_password.is_empty() { "" } else { "********" };
        writeln!(f, "DATABASE_HOST: {}", self.database_host)?;
        writeln!(f, "DATABASE_USER: {}", self.database_user)?;
        writeln!(f, "DATABASE_PASSWORD: {}", password)?;
        writeln!(f, "DATABASE_NAME: {}", self.database_name)?;
        writeln!(f, "PORT: {}", self.port)?;
        write!(f, "ENV: {}", self.environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.database_host, "localhost");
        assert_eq!(settings.environment, "development");
        assert_eq!(settings.database_user, "");
        assert_eq!(settings.database_password, "");
        assert_eq!(settings.database_name, "");
        assert!(!settings.is_production());
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_HOST", "db.internal"),
            ("DATABASE_USER", "souper"),
            ("DATABASE_PASSWORD", "hunter2"),
            ("DATABASE_NAME", "soups"),
            ("ENV", "production"),
            ("PORT", ""),
        ]
        .into_iter()
        .collect();

        let settings = Settings::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(settings.database_host, "db.internal");
        assert_eq!(settings.database_user, "souper");
        assert_eq!(settings.database_name, "soups");
        assert_eq!(settings.port, "");
        assert!(settings.is_production());
    }

    #[test]
    fn test_empty_values_fall_back() {
        let settings = Settings::from_lookup(|_| Some(String::new()));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_display_masks_password() {
        let settings = Settings {
            database_password: "hunter2".into(),
            ..Settings::default()
        };
        let rendered = settings.to_string();
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("DATABASE_PASSWORD: ********"));
        assert!(rendered.contains("ENV: development"));
    }
}
