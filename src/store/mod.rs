//! 存储网关
//!
//! 对外部键值存储的最小抽象：get / get_prefix / set / delete。
//! 每次调用都受单次请求超时约束；本层不做重试，也不校验内容。

pub mod etcd;
pub mod memory;

pub use etcd::EtcdStore;
pub use memory::MemoryStore;

use crate::error::{PortMapperError, Result};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// 前缀扫描返回的一条记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 键值存储后端 trait
///
/// 超时类失败必须以 [`PortMapperError::Timeout`] 返回，其余失败以
/// [`PortMapperError::Store`] 返回。
#[async_trait]
pub trait KvStore: Send + Sync {
    /// 读取单个 key，不存在时返回 `None`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// 按 key 升序返回所有以 `prefix` 开头的记录
    async fn get_prefix(&self, prefix: &str) -> Result<Vec<KeyValue>>;

    /// 写入（覆盖）单个 key
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// 删除单个 key，返回是否确实删除了记录
    async fn delete(&self, key: &str) -> Result<bool>;
}

/// 带单次请求超时的存储网关
#[derive(Clone)]
pub struct StoreGateway {
    store: Arc<dyn KvStore>,
    timeout: Duration,
}

impl StoreGateway {
    pub fn new(store: Arc<dyn KvStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.bounded("get", key, self.store.get(key)).await
    }

    /// 扫描 `root` 下的所有子节点
    ///
    /// 会在 `root` 后补 `/`，避免匹配到 `/root-other/...` 这样的兄弟路径
    pub async fn get_prefix(&self, root: &str) -> Result<Vec<KeyValue>> {
        let prefix = format!("{}/", root.trim_end_matches('/'));
        self.bounded("get_prefix", &prefix, self.store.get_prefix(&prefix))
            .await
    }

    pub async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.bounded("set", key, self.store.set(key, value)).await
    }

    pub async fn delete(&self, key: &str) -> Result<bool> {
        self.bounded("delete", key, self.store.delete(key)).await
    }

    async fn bounded<T, F>(&self, op: &str, key: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(PortMapperError::timeout(format!(
                "{} {} exceeded {:?}",
                op, key, self.timeout
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 永不返回的存储，用于验证超时
    struct HangingStore;

    #[async_trait]
    impl KvStore for HangingStore {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            std::future::pending().await
        }

        async fn get_prefix(&self, _prefix: &str) -> Result<Vec<KeyValue>> {
            std::future::pending().await
        }

        async fn set(&self, _key: &str, _value: &[u8]) -> Result<()> {
            std::future::pending().await
        }

        async fn delete(&self, _key: &str) -> Result<bool> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_store_times_out() {
        let gateway = StoreGateway::new(Arc::new(HangingStore), Duration::from_secs(5));

        let err = gateway.set("/r/web:80", b"{}").await.unwrap_err();
        assert!(err.is_timeout());

        let err = gateway.get_prefix("/r").await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_prefix_scan_excludes_sibling_roots() {
        let store = Arc::new(MemoryStore::new());
        store.set("/r/web:80", b"a").await.unwrap();
        store.set("/r-other/web:80", b"b").await.unwrap();

        let gateway = StoreGateway::new(store, Duration::from_secs(1));
        let entries = gateway.get_prefix("/r/").await.unwrap();

        assert_eq!(entries, vec![KeyValue::new("/r/web:80", b"a".to_vec())]);
    }
}
