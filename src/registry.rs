//! 服务注册与发现
//!
//! `PortMapper` 是对外暴露的入口：构建并校验服务记录，编码后交由重试执行器
//! 发起一次存储网关调用。每次调用都是独立的请求-响应周期，不保留会话状态。

use crate::codec;
use crate::config::PortMapperConfig;
use crate::error::Result;
use crate::retry::{Retrier, RetryPolicy};
use crate::service::Service;
use crate::store::{EtcdStore, KvStore, StoreGateway};
use std::sync::Arc;
use tracing::{debug, error, info};

/// 来源主机解析函数
pub type OriginResolver = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// 服务端口注册表客户端
#[derive(Clone)]
pub struct PortMapper {
    config: PortMapperConfig,
    gateway: StoreGateway,
    retrier: Retrier,
    origin: OriginResolver,
}

impl PortMapper {
    /// 使用给定的存储后端创建客户端
    pub fn new(config: PortMapperConfig, store: Arc<dyn KvStore>) -> Self {
        let gateway = StoreGateway::new(store, config.request_timeout());
        let retrier = Retrier::new(Arc::new(config.retry_policy()));
        let origin = env_origin(config.origin_env.clone());

        Self {
            config,
            gateway,
            retrier,
            origin,
        }
    }

    /// 连接配置中的 etcd 并创建客户端
    pub async fn connect(config: PortMapperConfig) -> Result<Self> {
        config.validate()?;
        let store = EtcdStore::connect(&config.endpoints, config.connect_timeout()).await?;

        Ok(Self::new(config, Arc::new(store)))
    }

    /// 替换重试策略
    pub fn with_retry_policy(mut self, policy: Arc<dyn RetryPolicy>) -> Self {
        self.retrier = Retrier::new(policy);
        self
    }

    /// 替换来源主机解析方式（默认读取 `origin_env` 指定的环境变量）
    pub fn with_origin_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.origin = Arc::new(resolver);
        self
    }

    pub fn config(&self) -> &PortMapperConfig {
        &self.config
    }

    /// 注册 (name, port)，重复注册会覆盖原记录
    pub async fn register(&self, name: &str, port: i32) -> Result<()> {
        let service = self.build_service(name, port)?;
        let payload = codec::encode(&service).inspect_err(|e| {
            error!(action = "Marshal", service = name, port, error = %e, "Marshalling failed");
        })?;
        let key = service.key(&self.config.registry_path);

        let gateway = &self.gateway;
        let (path, payload) = (key.as_str(), payload.as_slice());
        self.retrier
            .run("Register", || gateway.set(path, payload))
            .await?;

        info!(
            action = "set",
            service = name,
            port,
            path,
            "Successfully registered service with etcd"
        );
        Ok(())
    }

    /// 注销 (name, port)，记录不存在时视为成功
    pub async fn unregister(&self, name: &str, port: i32) -> Result<()> {
        let service = self.build_service(name, port)?;
        let key = service.key(&self.config.registry_path);

        let gateway = &self.gateway;
        let path = key.as_str();
        let removed = self
            .retrier
            .run("Unregister", || gateway.delete(path))
            .await?;

        if removed {
            info!(
                action = "delete",
                service = name,
                port,
                path,
                "Successfully unregistered service with etcd"
            );
        } else {
            debug!(action = "delete", service = name, port, path, "Service path not found");
        }
        Ok(())
    }

    /// 列出注册表中的所有服务，顺序与存储的前缀扫描顺序一致
    ///
    /// 任意一条记录解码失败都会使整个调用失败
    pub async fn list_services(&self) -> Result<Vec<Service>> {
        let gateway = &self.gateway;
        let root = self.config.registry_path.as_str();
        let entries = self
            .retrier
            .run("EnumerateServices", || gateway.get_prefix(root))
            .await?;

        let services = entries
            .iter()
            .map(|kv| codec::decode_entry(&kv.key, &kv.value))
            .collect::<Result<Vec<_>>>()
            .inspect_err(|e| {
                error!(action = "EnumerateServices", error = %e, "Service decoding failed");
            })?;

        debug!(count = services.len(), "Enumerated services");
        Ok(services)
    }

    /// 读取单个 (name, port) 的记录
    pub async fn get_service(&self, name: &str, port: i32) -> Result<Option<Service>> {
        let service = self.build_service(name, port)?;
        let key = service.key(&self.config.registry_path);

        let gateway = &self.gateway;
        let path = key.as_str();
        let value = self.retrier.run("GetService", || gateway.get(path)).await?;

        value
            .map(|bytes| codec::decode_entry(path, &bytes))
            .transpose()
    }

    fn build_service(&self, name: &str, port: i32) -> Result<Service> {
        let service = Service::new(name, port).with_origin((self.origin)());
        service.validate().inspect_err(|e| {
            error!(action = "Validate", service = name, port, error = %e, "Service validation failed");
        })?;
        Ok(service)
    }
}

fn env_origin(var: String) -> OriginResolver {
    Arc::new(move || std::env::var(&var).ok().filter(|v| !v.is_empty()))
}
