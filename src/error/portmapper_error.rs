//! Portmapper 统一错误类型

use super::code::ErrorCode;
use thiserror::Error;

/// Portmapper 统一错误类型
#[derive(Error, Debug, Clone)]
pub enum PortMapperError {
    /// 服务名称为空
    #[error("服务缺少名称字段 (port: {port})")]
    InvalidName { port: i32 },

    /// 端口超出 1-65535 范围
    #[error("服务 {name} 的端口 {port} 超出有效范围")]
    InvalidPort { name: String, port: i32 },

    /// 单次存储请求超时（可重试）
    #[error("存储请求超时: {0}")]
    Timeout(String),

    /// 非超时的存储错误（连接被拒绝、请求非法、权限等）
    #[error("存储错误: {0}")]
    Store(String),

    /// 服务记录编码失败
    #[error("编码错误: {0}")]
    Encode(String),

    /// 服务记录解码失败
    #[error("解码错误 (key: {}): {reason}", .key.as_deref().unwrap_or("<unknown>"))]
    Decode { key: Option<String>, reason: String },

    /// 重试次数耗尽，`last` 为最后一次观察到的超时错误
    #[error("重试 {attempts} 次后仍失败: {last}")]
    RetriesExhausted {
        attempts: usize,
        last: Box<PortMapperError>,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 本地运行时错误（如同步 API 无法创建 tokio 运行时）
    #[error("运行时错误: {0}")]
    Runtime(String),
}

impl PortMapperError {
    /// 创建超时错误
    pub fn timeout(msg: impl Into<String>) -> Self {
        PortMapperError::Timeout(msg.into())
    }

    /// 创建存储错误
    pub fn store(msg: impl Into<String>) -> Self {
        PortMapperError::Store(msg.into())
    }

    /// 创建配置错误
    pub fn config(msg: impl Into<String>) -> Self {
        PortMapperError::Config(msg.into())
    }

    /// 创建运行时错误
    pub fn runtime(msg: impl Into<String>) -> Self {
        PortMapperError::Runtime(msg.into())
    }

    /// 创建解码错误
    pub fn decode(key: Option<&str>, reason: impl Into<String>) -> Self {
        PortMapperError::Decode {
            key: key.map(str::to_string),
            reason: reason.into(),
        }
    }

    /// 获取错误代码
    pub fn code(&self) -> ErrorCode {
        match self {
            PortMapperError::InvalidName { .. } => ErrorCode::InvalidName,
            PortMapperError::InvalidPort { .. } => ErrorCode::InvalidPort,
            PortMapperError::Timeout(_) => ErrorCode::StoreTimeout,
            PortMapperError::Store(_) => ErrorCode::StoreError,
            PortMapperError::Encode(_) => ErrorCode::EncodeFailed,
            PortMapperError::Decode { .. } => ErrorCode::DecodeFailed,
            PortMapperError::RetriesExhausted { .. } => ErrorCode::RetriesExhausted,
            PortMapperError::Config(_) => ErrorCode::ConfigurationError,
            PortMapperError::Runtime(_) => ErrorCode::RuntimeError,
        }
    }

    /// 是否为超时类错误
    pub fn is_timeout(&self) -> bool {
        matches!(self, PortMapperError::Timeout(_))
    }

    /// 是否为服务记录校验错误（调用方编程错误）
    pub fn is_invalid_record(&self) -> bool {
        matches!(
            self,
            PortMapperError::InvalidName { .. } | PortMapperError::InvalidPort { .. }
        )
    }

    /// 判断是否为可重试的错误
    pub fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, PortMapperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_wraps_last_timeout() {
        let err = PortMapperError::RetriesExhausted {
            attempts: 11,
            last: Box::new(PortMapperError::timeout("set /a/web:80")),
        };

        assert_eq!(err.code(), ErrorCode::RetriesExhausted);
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("set /a/web:80"));
    }

    #[test]
    fn test_decode_display_without_key() {
        let err = PortMapperError::decode(None, "eof");
        assert!(err.to_string().contains("<unknown>"));
    }

    #[test]
    fn test_classification() {
        assert!(PortMapperError::timeout("x").is_timeout());
        assert!(!PortMapperError::store("x").is_timeout());
        assert!(PortMapperError::InvalidName { port: 80 }.is_invalid_record());
        assert!(!PortMapperError::config("x").is_invalid_record());
    }

    #[test]
    fn test_runtime_error_is_not_a_store_error() {
        let err = PortMapperError::runtime("failed to build runtime");
        assert_eq!(err.code(), ErrorCode::RuntimeError);
        assert_ne!(err.code().category(), crate::error::ErrorCategory::Store);
        assert!(!err.is_retryable());
    }
}
