//! 重试策略模块
//!
//! 单次存储操作只在超时时重试，其余错误立即返回

pub mod exponential;
pub mod fixed;
pub mod retrier;

pub use exponential::ExponentialBackoffPolicy;
pub use fixed::FixedRetryPolicy;
pub use retrier::Retrier;

use crate::error::PortMapperError;
use std::time::Duration;

/// 重试策略 trait
///
/// `attempt` 为已经完成的尝试次数（从 1 开始）
pub trait RetryPolicy: Send + Sync {
    fn should_retry(&self, attempt: usize, error: &PortMapperError) -> bool;
    /// 第 `attempt` 次重试前的等待时间（从 0 开始）
    fn backoff_duration(&self, attempt: usize) -> Duration;
    fn max_attempts(&self) -> usize;
}
