//! 会话条件引擎配置
//!
//! 通过 `personalisation_shared::config::load_layered` 分层加载：
//! 默认值 -> config/default.toml -> config/{env}.toml -> config/{service}.toml -> 环境变量。

use config::ConfigError;
use personalisation_shared::config::load_layered;
use personalisation_shared::observability::ObservabilityConfig;
use serde::Deserialize;

/// 默认服务名，同时决定服务特定配置文件名
pub const SERVICE_NAME: &str = "session-criteria";

/// 比较与匹配相关配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CriteriaConfig {
    /// RFC 3339 之后依次尝试的 chrono 日期格式
    pub date_formats: Vec<String>,
    /// 已编译正则的缓存上限，0 表示不缓存
    pub regex_cache_capacity: usize,
}

impl Default for CriteriaConfig {
    fn default() -> Self {
        Self {
            date_formats: default_date_formats(),
            regex_cache_capacity: 256,
        }
    }
}

fn default_date_formats() -> Vec<String> {
    [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d",
        "%d-%b-%Y %H:%M:%S%.f",
        "%d-%b-%Y %H:%M",
        "%d-%b-%Y",
        "%d %b %Y %H:%M:%S%.f",
        "%d %b %Y %H:%M",
        "%d %b %Y",
        "%d/%m/%Y %H:%M:%S%.f",
        "%d/%m/%Y %H:%M",
        "%d/%m/%Y",
        "%B %d, %Y %H:%M:%S",
        "%B %d, %Y",
        "%b %d, %Y",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// 服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub service_name: String,
    pub environment: String,
    pub observability: ObservabilityConfig,
    pub criteria: CriteriaConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: SERVICE_NAME.to_string(),
            environment: "development".to_string(),
            observability: ObservabilityConfig::default().with_service_name(SERVICE_NAME),
            criteria: CriteriaConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut config: Self = load_layered(SERVICE_NAME)?;
        // 可观测性标识跟随服务名
        config.observability = config.observability.with_service_name(&config.service_name);
        Ok(config)
    }
}
