//! 配置管理模块
//!
//! 支持多格式配置文件分层加载与环境变量覆盖，配置结构由各服务自行定义。

use config::{Config, ConfigError, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "PERSONALISATION";

/// 当前运行环境，默认 development
pub fn current_environment() -> String {
    std::env::var(format!("{}_ENV", ENV_PREFIX)).unwrap_or_else(|_| "development".to_string())
}

/// 配置目录，可通过 CONFIG_DIR 覆盖
pub fn config_dir() -> PathBuf {
    PathBuf::from(std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()))
}

/// 从配置文件和环境变量加载配置
///
/// 加载顺序（后加载的会覆盖先加载的同名配置项）：
/// 1. config/default.toml（默认配置）
/// 2. config/{environment}.toml（环境特定配置）
/// 3. config/{service_name}.toml（服务特定配置）
/// 4. 环境变量（PERSONALISATION_ 前缀，层级用双下划线，
///    如 PERSONALISATION_CRITERIA__REGEX_CACHE_CAPACITY -> criteria.regex_cache_capacity）
///
/// 目标结构应带 `#[serde(default)]`，缺失的文件和字段使用默认值。
pub fn load_layered<T: DeserializeOwned>(service_name: &str) -> Result<T, ConfigError> {
    load_from_dir(&config_dir(), service_name, &current_environment())
}

/// 从指定目录加载配置
pub fn load_from_dir<T: DeserializeOwned>(
    dir: &Path,
    service_name: &str,
    environment: &str,
) -> Result<T, ConfigError> {
    Config::builder()
        .set_default("service_name", service_name)?
        .set_default("environment", environment)?
        .add_source(File::from(dir.join("default.toml")).required(false))
        .add_source(File::from(dir.join(format!("{}.toml", environment))).required(false))
        .add_source(File::from(dir.join(format!("{}.toml", service_name))).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct SampleConfig {
        service_name: String,
        environment: String,
        threshold: u32,
    }

    #[test]
    fn test_defaults_without_files() {
        let dir = std::env::temp_dir().join("personalisation-config-missing");
        let config: SampleConfig = load_from_dir(&dir, "sample-service", "test").unwrap();
        assert_eq!(config.service_name, "sample-service");
        assert_eq!(config.environment, "test");
        assert_eq!(config.threshold, 0);
    }

    #[test]
    fn test_service_file_overrides_default() {
        let dir = std::env::temp_dir().join(format!(
            "personalisation-config-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("default.toml"), "threshold = 1\n").unwrap();
        std::fs::write(dir.join("layered-service.toml"), "threshold = 7\n").unwrap();

        let config: SampleConfig = load_from_dir(&dir, "layered-service", "test").unwrap();
        assert_eq!(config.threshold, 7);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
