//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 安装全局 fmt 日志订阅者
///
/// 优先使用 `RUST_LOG`，未设置时使用 `default_directive`（如 `"info"`、
/// `"flare_portmapper=debug"`）。重复调用不会报错，返回值表示本次是否生效。
pub fn init_logging(default_directive: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive))
        .with_target(true)
        .try_init()
        .is_ok()
}

/// 以 JSON 格式输出日志，适用于日志采集
pub fn init_json_logging(default_directive: &str) -> bool {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(default_directive))
        .try_init()
        .is_ok()
}

// RUST_LOG > default_directive > info
fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
