//! Configuration types and loading

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_SORT_BY_KEY: &str = "sort_by";
pub const DEFAULT_SORT_BY_DESCENDING_KEY: &str = "sort_by_descending";
pub const DEFAULT_SORT_KEY_TYPES: &[&str] = &[
    "string", "number", "integer", "float", "boolean", "date", "datetime",
];

/// Query-string key names and the sort key types a builder accepts.
///
/// Immutable once built. Use [`QueryConfig::builder`] to override any of the
/// defaults:
///
/// | option                   | default                |
/// |--------------------------|------------------------|
/// | `sort_by_key`            | `sort_by`              |
/// | `sort_by_descending_key` | `sort_by_descending`   |
/// | `allowed_sort_key_types` | [`DEFAULT_SORT_KEY_TYPES`] |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QueryConfigBuilder")]
pub struct QueryConfig {
    sort_by_key: String,
    sort_by_descending_key: String,
    allowed_sort_key_types: BTreeSet<String>,
}

impl QueryConfig {
    pub fn builder() -> QueryConfigBuilder {
        QueryConfigBuilder::default()
    }

    /// Query key holding the comma separated ascending sort keys
    pub fn sort_by_key(&self) -> &str {
        &self.sort_by_key
    }

    /// Query key holding the comma separated descending sort keys
    pub fn sort_by_descending_key(&self) -> &str {
        &self.sort_by_descending_key
    }

    pub fn allowed_sort_key_types(&self) -> &BTreeSet<String> {
        &self.allowed_sort_key_types
    }

    pub fn is_sort_key_type_allowed(&self, sort_type: &str) -> bool {
        self.allowed_sort_key_types.contains(sort_type)
    }

    /// Allowed types joined for error messages
    pub fn allowed_sort_key_types_display(&self) -> String {
        self.allowed_sort_key_types
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            sort_by_key: DEFAULT_SORT_BY_KEY.to_string(),
            sort_by_descending_key: DEFAULT_SORT_BY_DESCENDING_KEY.to_string(),
            allowed_sort_key_types: DEFAULT_SORT_KEY_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

/// Builder for [`QueryConfig`]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfigBuilder {
    sort_by_key: String,
    sort_by_descending_key: String,
    allowed_sort_key_types: BTreeSet<String>,
}

impl Default for QueryConfigBuilder {
    fn default() -> Self {
        let defaults = QueryConfig::default();
        Self {
            sort_by_key: defaults.sort_by_key,
            sort_by_descending_key: defaults.sort_by_descending_key,
            allowed_sort_key_types: defaults.allowed_sort_key_types,
        }
    }
}

impl QueryConfigBuilder {
    pub fn sort_by_key(mut self, key: impl Into<String>) -> Self {
        self.sort_by_key = key.into();
        self
    }

    pub fn sort_by_descending_key(mut self, key: impl Into<String>) -> Self {
        self.sort_by_descending_key = key.into();
        self
    }

    /// Replace the whole allowed type set
    pub fn allowed_sort_key_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_sort_key_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Add one type to the allowed set
    pub fn allow_sort_key_type(mut self, sort_type: impl Into<String>) -> Self {
        self.allowed_sort_key_types.insert(sort_type.into());
        self
    }

    pub fn build(self) -> Result<QueryConfig, ConfigError> {
        if self.sort_by_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "sort_by_key".into(),
                message: "must not be empty".into(),
            });
        }
        if self.sort_by_descending_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "sort_by_descending_key".into(),
                message: "must not be empty".into(),
            });
        }
        if self.sort_by_key == self.sort_by_descending_key {
            return Err(ConfigError::InvalidValue {
                key: "sort_by_descending_key".into(),
                message: format!("must differ from sort_by_key {:?}", self.sort_by_key),
            });
        }

        Ok(QueryConfig {
            sort_by_key: self.sort_by_key,
            sort_by_descending_key: self.sort_by_descending_key,
            allowed_sort_key_types: self.allowed_sort_key_types,
        })
    }
}

impl TryFrom<QueryConfigBuilder> for QueryConfig {
    type Error = ConfigError;

    fn try_from(builder: QueryConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Server
        if let Some(host) = var("HOST") {
            config.server.host = host;
        }
        if let Some(port) = var("PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".into(),
                message: format!("{:?} is not a valid port", port),
            })?;
        }

        // Query keys
        let mut query = QueryConfig::builder();
        if let Some(key) = var("QUERY_SORT_BY_KEY") {
            query = query.sort_by_key(key);
        }
        if let Some(key) = var("QUERY_SORT_BY_DESCENDING_KEY") {
            query = query.sort_by_descending_key(key);
        }
        if let Some(types) = var("QUERY_ALLOWED_SORT_KEY_TYPES") {
            let types: Vec<&str> = types
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect();
            if types.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "QUERY_ALLOWED_SORT_KEY_TYPES".into(),
                    message: "must list at least one type".into(),
                });
            }
            query = query.allowed_sort_key_types(types);
        }
        config.query = query.build()?;

        Ok(config)
    }

    /// Get the server address
    pub fn server_addr(&self) -> std::net::SocketAddr {
        use std::net::SocketAddr;
        let ip: std::net::IpAddr = self.server.host.parse().unwrap_or([0, 0, 0, 0].into());
        SocketAddr::new(ip, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_query_config() {
        let config = QueryConfig::default();
        assert_eq!(config.sort_by_key(), "sort_by");
        assert_eq!(config.sort_by_descending_key(), "sort_by_descending");
        assert!(config.is_sort_key_type_allowed("string"));
        assert!(config.is_sort_key_type_allowed("date"));
        assert!(!config.is_sort_key_type_allowed("enum"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = QueryConfig::builder()
            .sort_by_key("order")
            .sort_by_descending_key("order_desc")
            .allowed_sort_key_types(["string", "number"])
            .build()
            .unwrap();

        assert_eq!(config.sort_by_key(), "order");
        assert_eq!(config.sort_by_descending_key(), "order_desc");
        assert_eq!(config.allowed_sort_key_types().len(), 2);
        assert_eq!(config.allowed_sort_key_types_display(), "number, string");
    }

    #[test]
    fn test_allow_sort_key_type_extends_set() {
        let config = QueryConfig::builder()
            .allowed_sort_key_types(["string"])
            .allow_sort_key_type("enum")
            .build()
            .unwrap();

        assert!(config.is_sort_key_type_allowed("enum"));
        assert!(config.is_sort_key_type_allowed("string"));
        assert!(!config.is_sort_key_type_allowed("date"));
    }

    #[test]
    fn test_builder_rejects_bad_keys() {
        assert!(QueryConfig::builder().sort_by_key("").build().is_err());
        assert!(QueryConfig::builder()
            .sort_by_key("sort")
            .sort_by_descending_key("sort")
            .build()
            .is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: QueryConfig =
            serde_json::from_str(r#"{"sort_by_key": "order"}"#).unwrap();
        assert_eq!(config.sort_by_key(), "order");
        assert_eq!(config.sort_by_descending_key(), "sort_by_descending");

        let err = serde_json::from_str::<QueryConfig>(r#"{"sort_by_key": ""}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.query, QueryConfig::default());
    }

    #[test]
    fn test_from_vars() {
        let config = AppConfig::from_vars(vars(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("QUERY_SORT_BY_KEY", "order_by"),
            ("QUERY_ALLOWED_SORT_KEY_TYPES", "string, date"),
        ]))
        .unwrap();

        assert_eq!(config.server_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.query.sort_by_key(), "order_by");
        assert!(config.query.is_sort_key_type_allowed("date"));
        assert!(!config.query.is_sort_key_type_allowed("number"));
    }

    #[test]
    fn test_from_vars_rejects_invalid_values() {
        assert!(AppConfig::from_vars(vars(&[("PORT", "http")])).is_err());
        assert!(AppConfig::from_vars(vars(&[("QUERY_ALLOWED_SORT_KEY_TYPES", " , ")])).is_err());
    }
}
