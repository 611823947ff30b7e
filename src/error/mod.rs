//! Portmapper 错误处理模块
//!
//! 区分超时类错误（可重试）与其余错误（立即返回），并提供错误代码分类

pub mod code;
pub mod conversions;
pub mod portmapper_error;

pub use code::{ErrorCategory, ErrorCode};
pub use portmapper_error::{PortMapperError, Result};
