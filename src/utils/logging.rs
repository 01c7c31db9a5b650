/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug 或 info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wild_drafter={}", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 Wild Drafter 启动");
    info!("🌐 评分服务: {}", config.api_base_url);
    info!(
        "📊 推荐数量: {} | 预览防抖: {}ms",
        config.max_results, config.preview_debounce_ms
    );
    info!("{}", "=".repeat(60));
}

/// 记录一次问答完成
///
/// # 参数
/// - `answered`: 作答数量
/// - `results`: 推荐数量
pub fn log_session_complete(answered: usize, results: usize) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 问答完成 ({}): {} 个回答, {} 条推荐",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        answered,
        results
    );
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
