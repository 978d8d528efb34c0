//! `section.key` addressing for configuration values.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ConfigFile};

/// Every configurable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    RemoteApiUrl,
    RemoteLocalUrl,
    RemoteUseLocalServer,
    RemoteTimeoutSecs,
    StorageDirectory,
    QueryDistanceM,
    QueryIncludePrivate,
    ServerBind,
    ServerDataDirectory,
    ServerRequireCreator,
    LoggingLevel,
    LoggingDirectory,
}

const ALL_KEYS: [ConfigKey; 12] = [
    ConfigKey::RemoteApiUrl,
    ConfigKey::RemoteLocalUrl,
    ConfigKey::RemoteUseLocalServer,
    ConfigKey::RemoteTimeoutSecs,
    ConfigKey::StorageDirectory,
    ConfigKey::QueryDistanceM,
    ConfigKey::QueryIncludePrivate,
    ConfigKey::ServerBind,
    ConfigKey::ServerDataDirectory,
    ConfigKey::ServerRequireCreator,
    ConfigKey::LoggingLevel,
    ConfigKey::LoggingDirectory,
];

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::RemoteApiUrl
            | ConfigKey::RemoteLocalUrl
            | ConfigKey::RemoteUseLocalServer
            | ConfigKey::RemoteTimeoutSecs => "remote",
            ConfigKey::StorageDirectory => "storage",
            ConfigKey::QueryDistanceM | ConfigKey::QueryIncludePrivate => "query",
            ConfigKey::ServerBind
            | ConfigKey::ServerDataDirectory
            | ConfigKey::ServerRequireCreator => "server",
            ConfigKey::LoggingLevel | ConfigKey::LoggingDirectory => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::RemoteApiUrl => "api_url",
            ConfigKey::RemoteLocalUrl => "local_url",
            ConfigKey::RemoteUseLocalServer => "use_local_server",
            ConfigKey::RemoteTimeoutSecs => "timeout_secs",
            ConfigKey::StorageDirectory => "directory",
            ConfigKey::QueryDistanceM => "distance_m",
            ConfigKey::QueryIncludePrivate => "include_private",
            ConfigKey::ServerBind => "bind",
            ConfigKey::ServerDataDirectory => "data_directory",
            ConfigKey::ServerRequireCreator => "require_creator",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as written to the file; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::RemoteApiUrl => config.remote.api_url.clone(),
            ConfigKey::RemoteLocalUrl => config.remote.local_url.clone(),
            ConfigKey::RemoteUseLocalServer => config.remote.use_local_server.to_string(),
            ConfigKey::RemoteTimeoutSecs => config.remote.timeout_secs.to_string(),
            ConfigKey::StorageDirectory => config.storage.directory.display().to_string(),
            ConfigKey::QueryDistanceM => config.query.distance_m.to_string(),
            ConfigKey::QueryIncludePrivate => config.query.include_private.to_string(),
            ConfigKey::ServerBind => config.server.bind.to_string(),
            ConfigKey::ServerDataDirectory => config.server.data_directory.display().to_string(),
            ConfigKey::ServerRequireCreator => config.server.require_creator.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Parse and store `value`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::RemoteApiUrl => config.remote.api_url = self.url(value)?,
            ConfigKey::RemoteLocalUrl => config.remote.local_url = self.url(value)?,
            ConfigKey::RemoteUseLocalServer => config.remote.use_local_server = self.flag(value)?,
            ConfigKey::RemoteTimeoutSecs => {
                config.remote.timeout_secs = match value.parse::<u64>() {
                    Ok(secs) if secs > 0 => secs,
                    _ => return Err(self.invalid(value, "expected a positive number of seconds")),
                }
            }
            ConfigKey::StorageDirectory => config.storage.directory = self.path(value)?,
            ConfigKey::QueryDistanceM => {
                config.query.distance_m = match value.parse::<f64>() {
                    Ok(d) if d.is_finite() && d >= 0.0 => d,
                    _ => return Err(self.invalid(value, "expected a distance in meters")),
                }
            }
            ConfigKey::QueryIncludePrivate => config.query.include_private = self.flag(value)?,
            ConfigKey::ServerBind => {
                config.server.bind = value
                    .parse::<SocketAddr>()
                    .map_err(|_| self.invalid(value, "expected host:port, e.g. 127.0.0.1:3000"))?
            }
            ConfigKey::ServerDataDirectory => config.server.data_directory = self.path(value)?,
            ConfigKey::ServerRequireCreator => config.server.require_creator = self.flag(value)?,
            ConfigKey::LoggingLevel => {
                if value.is_empty() {
                    return Err(self.invalid(value, "expected a level such as info or debug"));
                }
                config.logging.level = value.to_string();
            }
            ConfigKey::LoggingDirectory => {
                config.logging.directory = (!value.is_empty()).then(|| PathBuf::from(value));
            }
        }
        Ok(())
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    fn flag(&self, value: &str) -> Result<bool, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => Err(self.invalid(value, "expected true or false")),
        }
    }

    fn url(&self, value: &str) -> Result<String, ConfigError> {
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(value.trim_end_matches('/').to_string())
        } else {
            Err(self.invalid(value, "expected an http:// or https:// URL"))
        }
    }

    fn path(&self, value: &str) -> Result<PathBuf, ConfigError> {
        if value.is_empty() {
            return Err(self.invalid(value, "expected a directory path"));
        }
        Ok(expand_home(value))
    }
}

/// Expand a leading `~/`.
fn expand_home(value: &str) -> PathBuf {
    match (value.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(value),
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_names() {
        assert_eq!(
            "remote.api_url".parse::<ConfigKey>().unwrap(),
            ConfigKey::RemoteApiUrl
        );
        assert_eq!(
            "LOGGING.directory".parse::<ConfigKey>().unwrap(),
            ConfigKey::LoggingDirectory
        );
        assert!(matches!(
            "remote.nope".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<String> = ConfigKey::all().iter().map(ConfigKey::name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ConfigKey::all().len());
    }

    #[test]
    fn test_set_validates() {
        let mut config = ConfigFile::default();

        ConfigKey::QueryIncludePrivate.set(&mut config, "no").unwrap();
        assert!(!config.query.include_private);

        ConfigKey::RemoteApiUrl
            .set(&mut config, "http://example.test/api/")
            .unwrap();
        assert_eq!(config.remote.api_url, "http://example.test/api");

        assert!(ConfigKey::RemoteApiUrl.set(&mut config, "ftp://x").is_err());
        assert!(ConfigKey::RemoteTimeoutSecs.set(&mut config, "0").is_err());
        assert!(ConfigKey::QueryDistanceM.set(&mut config, "-1").is_err());
        assert!(ConfigKey::ServerBind.set(&mut config, "localhost").is_err());
    }

    #[test]
    fn test_logging_directory_can_be_unset() {
        let mut config = ConfigFile::default();
        ConfigKey::LoggingDirectory.set(&mut config, "").unwrap();
        assert_eq!(config.logging.directory, None);
        assert_eq!(ConfigKey::LoggingDirectory.get(&config), "");
    }

    #[test]
    fn test_get_set_agree() {
        let original = ConfigFile::default();
        let mut copy = ConfigFile::default();
        for key in ConfigKey::all() {
            key.set(&mut copy, &key.get(&original)).unwrap();
        }
        assert_eq!(copy, original);
    }
}
