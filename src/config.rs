use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// 单次评分请求允许的最小结果数
pub const MIN_RESULTS: u32 = 1;
/// 单次评分请求允许的最大结果数
pub const MAX_RESULTS: u32 = 30;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 评分服务地址
    pub api_base_url: String,
    /// 默认返回的推荐数量
    pub max_results: u32,
    /// 实时预览的防抖窗口（毫秒）
    pub preview_debounce_ms: u64,
    /// 覆盖数据的存放目录
    pub override_store_dir: String,
    // --- 图标配置 ---
    pub icon_cdn_base: String,
    pub icon_cdn_version: String,
    pub default_icon: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".to_string(),
            max_results: 6,
            preview_debounce_ms: 120,
            override_store_dir: ".wild_drafter".to_string(),
            icon_cdn_base: "https://ddragon.leagueoflegends.com/cdn".to_string(),
            icon_cdn_version: "14.23.1".to_string(),
            default_icon: "/static/icons/default.png".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 先读取 TOML 配置文件，再用环境变量覆盖
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })?;
        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(self) -> Self {
        let base = self;
        Self {
            api_base_url: std::env::var("WILD_DRAFTER_API_BASE_URL").unwrap_or(base.api_base_url),
            max_results: clamp_max_results(
                std::env::var("WILD_DRAFTER_MAX_RESULTS").ok().and_then(|v| v.parse().ok()).unwrap_or(base.max_results),
            ),
            preview_debounce_ms: std::env::var("WILD_DRAFTER_PREVIEW_DEBOUNCE_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(base.preview_debounce_ms),
            override_store_dir: std::env::var("WILD_DRAFTER_STORE_DIR").unwrap_or(base.override_store_dir),
            icon_cdn_base: std::env::var("WILD_DRAFTER_ICON_CDN").unwrap_or(base.icon_cdn_base),
            icon_cdn_version: std::env::var("WILD_DRAFTER_ICON_VERSION").unwrap_or(base.icon_cdn_version),
            default_icon: std::env::var("WILD_DRAFTER_DEFAULT_ICON").unwrap_or(base.default_icon),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(base.verbose_logging),
        }
    }
}

/// 将结果数量限制在 [1, 30]
pub fn clamp_max_results(value: u32) -> u32 {
    value.clamp(MIN_RESULTS, MAX_RESULTS)
}
