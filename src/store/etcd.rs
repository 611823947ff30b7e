//! etcd 存储后端

use super::{KeyValue, KvStore};
use crate::error::{PortMapperError, Result};
use async_trait::async_trait;
use etcd_client::{Client, ConnectOptions, GetOptions};
use std::time::Duration;
use tracing::{info, warn};

/// etcd 存储后端
///
/// `Client` 内部共享同一个 gRPC 通道，每次请求克隆一份即可
#[derive(Clone)]
pub struct EtcdStore {
    client: Client,
}

impl EtcdStore {
    /// 连接 etcd
    ///
    /// 不设置 gRPC 通道级的请求超时，单次请求的截止时间只由 `StoreGateway` 控制
    pub async fn connect(endpoints: &[String], connect_timeout: Duration) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(PortMapperError::config("etcd endpoints not configured"));
        }

        let options = ConnectOptions::new().with_connect_timeout(connect_timeout);

        let client = Client::connect(endpoints, Some(options))
            .await
            .map_err(|e| PortMapperError::store(format!("Failed to connect to etcd: {}", e)))?;

        info!(endpoints = ?endpoints, "Connected to etcd");
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KvStore for EtcdStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut client = self.client.clone();
        let resp = client.get(key, None).await?;
        Ok(resp.kvs().first().map(|kv| kv.value().to_vec()))
    }

    async fn get_prefix(&self, prefix: &str) -> Result<Vec<KeyValue>> {
        let mut client = self.client.clone();
        // etcd 的范围查询默认按 key 升序返回
        let opts = GetOptions::new().with_prefix();
        let resp = client.get(prefix, Some(opts)).await?;

        resp.kvs()
            .iter()
            .map(|kv| Ok(KeyValue::new(entry_key(kv.key())?, kv.value().to_vec())))
            .collect()
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut client = self.client.clone();
        client.put(key, value.to_vec(), None).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut client = self.client.clone();
        let resp = client.delete(key, None).await?;
        Ok(resp.deleted() > 0)
    }
}

// 非 UTF-8 的 key 不做有损转换，避免错误信息指向一个并不存在的 key
fn entry_key(raw: &[u8]) -> Result<String> {
    match std::str::from_utf8(raw) {
        Ok(key) => Ok(key.to_string()),
        Err(e) => {
            let lossy = String::from_utf8_lossy(raw);
            warn!(key = %lossy, error = %e, "Registry key is not valid UTF-8");
            Err(PortMapperError::decode(
                None,
                format!("registry key is not valid UTF-8 ({:?}): {}", raw, e),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_key_accepts_utf8() {
        assert_eq!(
            entry_key(b"/opsee.co/portmapper/web:8080").unwrap(),
            "/opsee.co/portmapper/web:8080"
        );
    }

    #[test]
    fn test_entry_key_rejects_invalid_utf8() {
        let err = entry_key(b"/opsee.co/portmapper/\xffweb:80").unwrap_err();
        match err {
            PortMapperError::Decode { key, reason } => {
                assert_eq!(key, None);
                assert!(reason.contains("UTF-8"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
