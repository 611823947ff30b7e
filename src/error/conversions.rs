//! 错误类型转换实现
//!
//! 提供各种错误类型之间的转换

use super::PortMapperError;

impl From<serde_json::Error> for PortMapperError {
    fn from(err: serde_json::Error) -> Self {
        PortMapperError::decode(None, format!("JSON 反序列化错误: {}", err))
    }
}

impl From<toml::de::Error> for PortMapperError {
    fn from(err: toml::de::Error) -> Self {
        PortMapperError::config(format!("TOML 解析错误: {}", err))
    }
}

impl From<std::io::Error> for PortMapperError {
    fn from(err: std::io::Error) -> Self {
        PortMapperError::config(format!("IO 错误: {}", err))
    }
}

impl From<etcd_client::Error> for PortMapperError {
    fn from(err: etcd_client::Error) -> Self {
        match &err {
            etcd_client::Error::GRpcStatus(status) if is_timeout_status(status) => {
                PortMapperError::timeout(status.message().to_string())
            }
            _ => PortMapperError::store(err.to_string()),
        }
    }
}

/// 判断 gRPC 状态是否为超时类失败
///
/// 除服务端返回的 `DeadlineExceeded` 外，tonic 通道级超时触发时返回的是
/// `Cancelled("Timeout expired")`，同样按超时处理
fn is_timeout_status(status: &tonic::Status) -> bool {
    match status.code() {
        tonic::Code::DeadlineExceeded => true,
        tonic::Code::Cancelled => status.message().contains("Timeout expired"),
        _ => false,
    }
}
