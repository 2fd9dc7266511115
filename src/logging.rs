//! 日志初始化

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化全局 tracing 订阅者
///
/// `RUST_LOG` 存在时优先生效，否则使用给定级别。重复调用是安全的。
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
