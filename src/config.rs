//! Console configuration from the environment (and `.env`), with CLI overrides

use std::path::PathBuf;

use crate::error::{ConsoleError, Result};
use crate::ui::Theme;

pub const DEFAULT_API_URL: &str = "http://localhost:8001";
pub const DEFAULT_STATE_PATH: &str = "state";
pub const DEFAULT_LIST_LIMIT: u32 = 1000;
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Server root of the registry API, without the `/api` suffix
    pub api_url: String,
    /// Directory holding the persisted session
    pub state_path: PathBuf,
    /// How many records the list views request
    pub list_limit: u32,
    pub theme: Theme,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            list_limit: DEFAULT_LIST_LIMIT,
            theme: Theme::default(),
        }
    }
}

impl ConsoleConfig {
    /// Read `REGISTRY_API_URL`, `STATE_PATH`, `REGISTRY_LIST_LIMIT` and
    /// `CONSOLE_THEME`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let list_limit = match lookup("REGISTRY_LIST_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConsoleError::ConfigValidation {
                    message: format!("REGISTRY_LIST_LIMIT must be a positive integer, got '{}'", raw),
                })?,
            None => defaults.list_limit,
        };

        let theme = match lookup("CONSOLE_THEME") {
            Some(raw) => raw
                .parse::<Theme>()
                .map_err(|message| ConsoleError::ConfigValidation { message })?,
            None => defaults.theme,
        };

        Ok(Self {
            api_url: lookup("REGISTRY_API_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.api_url),
            state_path: lookup("STATE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_path),
            list_limit,
            theme,
        })
    }

    pub fn session_file(&self) -> PathBuf {
        self.state_path.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.session_file(), PathBuf::from("state/session.json"));
    }

    #[test]
    fn test_overrides() {
        let config = ConsoleConfig::from_lookup(lookup_from(&[
            ("REGISTRY_API_URL", "https://registry.example.org"),
            ("STATE_PATH", "/tmp/console"),
            ("REGISTRY_LIST_LIMIT", "250"),
            ("CONSOLE_THEME", "Boxed"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://registry.example.org");
        assert_eq!(config.session_file(), PathBuf::from("/tmp/console/session.json"));
        assert_eq!(config.list_limit, 250);
        assert_eq!(config.theme, Theme::Boxed);
    }

    #[test]
    fn test_invalid_values() {
        for pairs in [
            [("REGISTRY_LIST_LIMIT", "0")],
            [("REGISTRY_LIST_LIMIT", "lots")],
            [("CONSOLE_THEME", "neon")],
        ] {
            assert!(matches!(
                ConsoleConfig::from_lookup(lookup_from(&pairs)),
                Err(ConsoleError::ConfigValidation { .. })
            ));
        }
    }
}
