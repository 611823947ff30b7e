//! 重试执行器
//!
//! 执行一次逻辑操作：成功立即返回；超时则按策略退避后重试；
//! 其他错误立即返回；超时重试耗尽后返回最后一次超时错误。

use super::RetryPolicy;
use crate::error::{PortMapperError, Result};
use std::future::Future;
use std::sync::Arc;
use tracing::{error, warn};

/// 重试执行器
#[derive(Clone)]
pub struct Retrier {
    policy: Arc<dyn RetryPolicy>,
}

impl Retrier {
    pub fn new(policy: Arc<dyn RetryPolicy>) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &dyn RetryPolicy {
        self.policy.as_ref()
    }

    /// 执行 `op`，直到成功、遇到不可重试错误或重试耗尽
    pub async fn run<T, F, Fut>(&self, action: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0usize;
        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            attempt += 1;

            if self.policy.should_retry(attempt, &err) {
                let delay = self.policy.backoff_duration(attempt - 1);
                warn!(
                    action,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Store request exceeded deadline. Retrying"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            if err.is_retryable() {
                error!(action, attempts = attempt, error = %err, "Store request retries exhausted");
                return Err(PortMapperError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            error!(action, attempt, error = %err, "Store request failed");
            return Err(err);
        }
    }
}
