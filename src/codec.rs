//! 服务记录编解码
//!
//! 使用 JSON 作为存储格式，字段名保持不变，来源为空时省略 `hostname` 字段。

use crate::error::{PortMapperError, Result};
use crate::service::Service;

/// 将服务记录编码为字节
pub fn encode(service: &Service) -> Result<Vec<u8>> {
    serde_json::to_vec(service)
        .map_err(|e| PortMapperError::Encode(format!("Failed to serialize service {}: {}", service, e)))
}

/// 从字节解码服务记录
pub fn decode(bytes: &[u8]) -> Result<Service> {
    Ok(serde_json::from_slice(bytes)?)
}

/// 解码存储中某个 key 对应的服务记录，错误中携带该 key
pub fn decode_entry(key: &str, bytes: &[u8]) -> Result<Service> {
    serde_json::from_slice(bytes).map_err(|e| PortMapperError::decode(Some(key), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_with_origin() {
        let svc = Service::new("web", 8080).with_origin(Some("c0ffee".to_string()));
        let bytes = encode(&svc).unwrap();
        assert_eq!(decode(&bytes).unwrap(), svc);
    }

    #[test]
    fn test_round_trip_without_origin() {
        let svc = Service::new("api", 9000);
        let bytes = encode(&svc).unwrap();

        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            r#"{"name":"api","port":9000}"#
        );
        assert_eq!(decode(&bytes).unwrap().origin, None);
    }

    #[test]
    fn test_decode_legacy_payloads() {
        let svc = decode(br#"{"name":"web","port":80,"hostname":""}"#).unwrap();
        assert_eq!(svc, Service::new("web", 80));

        let svc = decode(br#"{"name":"web","port":80,"hostname":"box-1"}"#).unwrap();
        assert_eq!(svc.origin.as_deref(), Some("box-1"));
    }

    #[test]
    fn test_decode_entry_reports_key() {
        let err = decode_entry("/opsee.co/portmapper/web:80", b"not json").unwrap_err();
        match err {
            PortMapperError::Decode { key, .. } => {
                assert_eq!(key.as_deref(), Some("/opsee.co/portmapper/web:80"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
