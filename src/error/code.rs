//! 错误代码和错误类别定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 错误代码枚举
///
/// 错误代码按类别分组，每个类别占用1000个代码范围：
/// - 1000-1999: 服务记录校验错误
/// - 2000-2999: 存储相关错误
/// - 3000-3999: 序列化相关错误
/// - 4000-4999: 配置相关错误
/// - 5000-5999: 运行时相关错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ErrorCode {
    // ============================================================
    // 校验错误 (1000-1999)
    // ============================================================
    InvalidName = 1000,
    InvalidPort = 1001,

    // ============================================================
    // 存储相关错误 (2000-2999)
    // ============================================================
    StoreTimeout = 2000,
    StoreError = 2001,
    RetriesExhausted = 2002,

    // ============================================================
    // 序列化相关错误 (3000-3999)
    // ============================================================
    EncodeFailed = 3000,
    DecodeFailed = 3001,

    // ============================================================
    // 配置相关错误 (4000-4999)
    // ============================================================
    ConfigurationError = 4000,

    // ============================================================
    // 运行时相关错误 (5000-5999)
    // ============================================================
    RuntimeError = 5000,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ErrorCode {
    /// 获取错误代码的数字值
    #[inline]
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    /// 从数字值创建错误代码
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            1000 => Some(ErrorCode::InvalidName),
            1001 => Some(ErrorCode::InvalidPort),
            2000 => Some(ErrorCode::StoreTimeout),
            2001 => Some(ErrorCode::StoreError),
            2002 => Some(ErrorCode::RetriesExhausted),
            3000 => Some(ErrorCode::EncodeFailed),
            3001 => Some(ErrorCode::DecodeFailed),
            4000 => Some(ErrorCode::ConfigurationError),
            5000 => Some(ErrorCode::RuntimeError),
            _ => None,
        }
    }

    /// 获取错误代码的英文标识符
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidName => "INVALID_NAME",
            ErrorCode::InvalidPort => "INVALID_PORT",
            ErrorCode::StoreTimeout => "STORE_TIMEOUT",
            ErrorCode::StoreError => "STORE_ERROR",
            ErrorCode::RetriesExhausted => "RETRIES_EXHAUSTED",
            ErrorCode::EncodeFailed => "ENCODE_FAILED",
            ErrorCode::DecodeFailed => "DECODE_FAILED",
            ErrorCode::ConfigurationError => "CONFIGURATION_ERROR",
            ErrorCode::RuntimeError => "RUNTIME_ERROR",
        }
    }

    /// 获取错误代码的类别
    pub fn category(&self) -> ErrorCategory {
        match self.as_u32() {
            1000..=1999 => ErrorCategory::Validation,
            2000..=2999 => ErrorCategory::Store,
            3000..=3999 => ErrorCategory::Serialization,
            4000..=4999 => ErrorCategory::Configuration,
            _ => ErrorCategory::Runtime,
        }
    }

    /// 判断是否为可重试的错误
    ///
    /// 只有超时类错误会被重试，其余错误立即返回
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::StoreTimeout)
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Validation,
    Store,
    Serialization,
    Configuration,
    Runtime,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "VALIDATION"),
            ErrorCategory::Store => write!(f, "STORE"),
            ErrorCategory::Serialization => write!(f, "SERIALIZATION"),
            ErrorCategory::Configuration => write!(f, "CONFIGURATION"),
            ErrorCategory::Runtime => write!(f, "RUNTIME"),
        }
    }
}
