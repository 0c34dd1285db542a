use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 单次分析的超时时间（毫秒）
    pub analysis_timeout_ms: u64,
    /// 模拟分析服务的延迟（毫秒）
    pub simulated_latency_ms: u64,
    /// 答题反馈停留时间（毫秒）
    pub feedback_duration_ms: u64,
    /// 远程分析服务地址，未配置时使用模拟服务
    pub analysis_endpoint: Option<String>,
    /// 模拟服务的随机种子
    pub simulator_seed: Option<u64>,
    /// 题目文件路径，未配置时使用内置题目
    pub quiz_file: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analysis_timeout_ms: 30_000,
            simulated_latency_ms: 3_000,
            feedback_duration_ms: 3_000,
            analysis_endpoint: None,
            simulator_seed: None,
            quiz_file: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 配置文件路径所在的环境变量
    pub const CONFIG_PATH_VAR: &'static str = "CLARIFY_CONFIG";

    /// 优先读取 `CLARIFY_CONFIG` 指向的 TOML 文件，否则读取环境变量
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(Self::CONFIG_PATH_VAR) {
            Ok(path) => Self::from_toml_file(path),
            Err(_) => Ok(Self::from_env()),
        }
    }

    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            analysis_timeout_ms: std::env::var("ANALYSIS_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.analysis_timeout_ms),
            simulated_latency_ms: std::env::var("SIMULATED_LATENCY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.simulated_latency_ms),
            feedback_duration_ms: std::env::var("FEEDBACK_DURATION_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.feedback_duration_ms),
            analysis_endpoint: std::env::var("ANALYSIS_ENDPOINT").ok().filter(|v| !v.is_empty()).or(default.analysis_endpoint),
            simulator_seed: std::env::var("SIMULATOR_SEED").ok().and_then(|v| v.parse().ok()).or(default.simulator_seed),
            quiz_file: std::env::var("QUIZ_FILE").ok().filter(|v| !v.is_empty()).or(default.quiz_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::ParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 未出现的字段取默认值
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_millis(self.analysis_timeout_ms)
    }

    pub fn feedback_duration(&self) -> Duration {
        Duration::from_millis(self.feedback_duration_ms)
    }
}
