use crate::error::{PortMapperError, Result};
use crate::retry::ExponentialBackoffPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 默认注册中心根路径
pub const DEFAULT_REGISTRY_PATH: &str = "/opsee.co/portmapper";

/// 默认最大尝试次数
pub const DEFAULT_MAX_RETRIES: usize = 11;

/// 默认单次请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PortMapperConfig {
    /// etcd 地址列表
    pub endpoints: Vec<String>,
    /// 所有服务记录所在的 key 前缀
    pub registry_path: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// 单次操作的最大尝试次数
    pub max_retries: usize,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
    /// 读取来源主机名的环境变量
    pub origin_env: String,
}

impl Default for PortMapperConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["http://127.0.0.1:2379".to_string()],
            registry_path: DEFAULT_REGISTRY_PATH.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: 5,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: 2,
            backoff_max_ms: 2000,
            origin_env: "HOSTNAME".to_string(),
        }
    }
}

impl PortMapperConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PortMapperConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 默认配置叠加环境变量
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 使用环境变量覆盖配置
    ///
    /// - `ETCD_HOST`: 逗号分隔的 etcd 地址
    /// - `PORTMAPPER_REGISTRY_PATH`
    /// - `PORTMAPPER_REQUEST_TIMEOUT_SECS`
    /// - `PORTMAPPER_MAX_RETRIES`
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(hosts) = lookup("ETCD_HOST") {
            let endpoints: Vec<String> = hosts
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !endpoints.is_empty() {
                self.endpoints = endpoints;
            }
        }
        if let Some(path) = lookup("PORTMAPPER_REGISTRY_PATH") {
            self.registry_path = path;
        }
        if let Some(secs) = lookup("PORTMAPPER_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = secs.parse().map_err(|e| {
                PortMapperError::config(format!("Invalid PORTMAPPER_REQUEST_TIMEOUT_SECS '{}': {}", secs, e))
            })?;
        }
        if let Some(retries) = lookup("PORTMAPPER_MAX_RETRIES") {
            self.max_retries = retries.parse().map_err(|e| {
                PortMapperError::config(format!("Invalid PORTMAPPER_MAX_RETRIES '{}': {}", retries, e))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(PortMapperError::config("etcd endpoints not configured"));
        }
        if !self.registry_path.starts_with('/') {
            return Err(PortMapperError::config(format!(
                "registry_path must start with '/': {}",
                self.registry_path
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(PortMapperError::config("request_timeout_secs must be greater than 0"));
        }
        if self.max_retries == 0 {
            return Err(PortMapperError::config("max_retries must be greater than 0"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// 根据配置构建默认的指数退避策略
    pub fn retry_policy(&self) -> ExponentialBackoffPolicy {
        ExponentialBackoffPolicy::new(
            self.max_retries,
            Duration::from_millis(self.backoff_base_ms),
            Duration::from_millis(self.backoff_max_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = PortMapperConfig::default();
        assert_eq!(config.registry_path, "/opsee.co/portmapper");
        assert_eq!(config.max_retries, 11);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PortMapperConfig::from_toml_str(
            r#"
            endpoints = ["http://etcd-0:2379", "http://etcd-1:2379"]
            max_retries = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.registry_path, DEFAULT_REGISTRY_PATH);
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        let err = PortMapperConfig::from_toml_str(r#"registry_path = "relative/path""#).unwrap_err();
        assert!(matches!(err, PortMapperError::Config(_)));

        let err = PortMapperConfig::from_toml_str("max_retries = 0").unwrap_err();
        assert!(matches!(err, PortMapperError::Config(_)));

        let err = PortMapperConfig::from_toml_str("max_retries = \"many\"").unwrap_err();
        assert!(matches!(err, PortMapperError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ETCD_HOST", "http://a:2379, http://b:2379"),
            ("PORTMAPPER_REGISTRY_PATH", "/custom/root"),
            ("PORTMAPPER_MAX_RETRIES", "4"),
        ]
        .into_iter()
        .collect();

        let mut config = PortMapperConfig::default();
        config
            .apply_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.endpoints, vec!["http://a:2379", "http://b:2379"]);
        assert_eq!(config.registry_path, "/custom/root");
        assert_eq!(config.max_retries, 4);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_bad_override_is_config_error() {
        let mut config = PortMapperConfig::default();
        let err = config
            .apply_overrides(|name| {
                (name == "PORTMAPPER_REQUEST_TIMEOUT_SECS").then(|| "soon".to_string())
            })
            .unwrap_err();
        assert!(matches!(err, PortMapperError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("portmapper-config-{}.toml", std::process::id()));
        std::fs::write(&path, "registry_path = \"/svc\"\nrequest_timeout_secs = 2\n").unwrap();

        let config = PortMapperConfig::load_from_file(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.registry_path, "/svc");
        assert_eq!(config.request_timeout(), Duration::from_secs(2));
    }
}
