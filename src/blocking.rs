//! 同步 API
//!
//! 为非异步调用方提供阻塞版本的 `PortMapper`，内部持有一个单线程 tokio 运行时。
//! 不能在异步运行时内部调用。

use crate::config::PortMapperConfig;
use crate::error::{PortMapperError, Result};
use crate::registry;
use crate::service::Service;
use crate::store::KvStore;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// 阻塞版本的服务端口注册表客户端
pub struct PortMapper {
    inner: registry::PortMapper,
    runtime: Runtime,
}

impl PortMapper {
    pub fn new(config: PortMapperConfig, store: Arc<dyn KvStore>) -> Result<Self> {
        Ok(Self {
            inner: registry::PortMapper::new(config, store),
            runtime: build_runtime()?,
        })
    }

    pub fn connect(config: PortMapperConfig) -> Result<Self> {
        let runtime = build_runtime()?;
        let inner = runtime.block_on(registry::PortMapper::connect(config))?;
        Ok(Self { inner, runtime })
    }

    /// 从异步客户端构建（例如已设置自定义重试策略的客户端）
    pub fn from_async(inner: registry::PortMapper) -> Result<Self> {
        Ok(Self {
            inner,
            runtime: build_runtime()?,
        })
    }

    pub fn register(&self, name: &str, port: i32) -> Result<()> {
        self.runtime.block_on(self.inner.register(name, port))
    }

    pub fn unregister(&self, name: &str, port: i32) -> Result<()> {
        self.runtime.block_on(self.inner.unregister(name, port))
    }

    pub fn list_services(&self) -> Result<Vec<Service>> {
        self.runtime.block_on(self.inner.list_services())
    }

    pub fn get_service(&self, name: &str, port: i32) -> Result<Option<Service>> {
        self.runtime.block_on(self.inner.get_service(name, port))
    }
}

fn build_runtime() -> Result<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(runtime_error)
}

fn runtime_error(err: std::io::Error) -> PortMapperError {
    PortMapperError::runtime(format!("Failed to build tokio runtime: {}", err))
}
