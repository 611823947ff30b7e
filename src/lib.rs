//! Flare Portmapper
//!
//! 基于 etcd 的服务端口注册表：进程注册 (name, port)，其他进程列出所有已注册的服务。
//! 所有存储操作都受单次请求超时约束，超时按指数退避重试，其余错误立即返回。
//!
//! ```no_run
//! use flare_portmapper::{PortMapper, PortMapperConfig};
//!
//! # async fn run() -> flare_portmapper::Result<()> {
//! let mapper = PortMapper::connect(PortMapperConfig::from_env()?).await?;
//! mapper.register("web", 8080).await?;
//! for service in mapper.list_services().await? {
//!     println!("{}", service);
//! }
//! mapper.unregister("web", 8080).await?;
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod codec;
pub mod config;
pub mod error;
pub mod registry;
pub mod retry;
pub mod service;
pub mod store;
pub mod telemetry;

// Re-exports
pub use config::{DEFAULT_MAX_RETRIES, DEFAULT_REGISTRY_PATH, PortMapperConfig};
pub use error::{ErrorCategory, ErrorCode, PortMapperError, Result};
pub use registry::{OriginResolver, PortMapper};
pub use retry::{ExponentialBackoffPolicy, FixedRetryPolicy, Retrier, RetryPolicy};
pub use service::Service;
pub use store::{EtcdStore, KeyValue, KvStore, MemoryStore, StoreGateway};
