//! 服务记录定义
//!
//! 一条服务记录是 (name, port, origin) 三元组，负责自身的校验以及在存储中的 key。

use crate::error::{PortMapperError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 端口有效范围下界
pub const MIN_PORT: i32 = 1;

/// 端口有效范围上界
pub const MAX_PORT: i32 = 65535;

/// 服务名称到端口的映射
///
/// `origin` 为发布该记录的主机名或容器 ID，序列化字段名为 `hostname`，
/// 为空时不写入。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Service {
    pub name: String,
    pub port: i32,
    #[serde(
        rename = "hostname",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_origin"
    )]
    pub origin: Option<String>,
}

impl Service {
    /// 创建新的服务记录（不做校验）
    pub fn new(name: impl Into<String>, port: i32) -> Self {
        Self {
            name: name.into(),
            port,
            origin: None,
        }
    }

    /// 设置来源主机
    ///
    /// 空字符串等同于未知来源。
    pub fn with_origin(mut self, origin: Option<String>) -> Self {
        self.origin = origin.filter(|o| !o.is_empty());
        self
    }

    /// 校验服务名称非空且端口在有效范围内
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(PortMapperError::InvalidName { port: self.port });
        }
        if !(MIN_PORT..=MAX_PORT).contains(&self.port) {
            return Err(PortMapperError::InvalidPort {
                name: self.name.clone(),
                port: self.port,
            });
        }
        Ok(())
    }

    /// 返回服务在注册中心下的完整 key：`<root>/<name>:<port>`
    pub fn key(&self, registry_path: &str) -> String {
        format!(
            "{}/{}:{}",
            registry_path.trim_end_matches('/'),
            self.name,
            self.port
        )
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            Some(origin) => write!(f, "{}:{} ({})", self.name, self.port, origin),
            None => write!(f, "{}:{}", self.name, self.port),
        }
    }
}

// 旧版写入方可能写入空字符串的 hostname，统一视为未知来源
fn deserialize_origin<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/opsee.co/portmapper";

    #[test]
    fn test_validate_rejects_empty_name() {
        for port in [-1, 0, 1, 8080, 65535, 65536] {
            let err = Service::new("", port).validate().unwrap_err();
            assert!(matches!(err, PortMapperError::InvalidName { .. }));
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_ports() {
        for port in [0, 65536, -1, i32::MIN, i32::MAX] {
            let err = Service::new("web", port).validate().unwrap_err();
            assert!(
                matches!(err, PortMapperError::InvalidPort { port: p, .. } if p == port),
                "port {} should be rejected",
                port
            );
        }
    }

    #[test]
    fn test_validate_accepts_boundaries() {
        assert!(Service::new("web", 1).validate().is_ok());
        assert!(Service::new("web", 65535).validate().is_ok());
    }

    #[test]
    fn test_key_is_stable_and_port_sensitive() {
        let a = Service::new("web", 8080);
        let b = Service::new("web", 8080).with_origin(Some("host-a".to_string()));
        let c = Service::new("web", 8081);

        assert_eq!(a.key(ROOT), "/opsee.co/portmapper/web:8080");
        assert_eq!(a.key(ROOT), b.key(ROOT));
        assert_ne!(a.key(ROOT), c.key(ROOT));
    }

    #[test]
    fn test_key_trims_trailing_slash() {
        let svc = Service::new("api", 9000);
        assert_eq!(svc.key("/registry/"), svc.key("/registry"));
    }

    #[test]
    fn test_empty_origin_is_absent() {
        let svc = Service::new("web", 80).with_origin(Some(String::new()));
        assert_eq!(svc.origin, None);
    }
}
