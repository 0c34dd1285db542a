//! 分析服务 - 业务能力层
//!
//! `AnalysisProvider` 是编排层唯一依赖的外部能力。
//!
//! ## 实现
//! - `SimulatedProvider`：随机结果 + 固定延迟，用于演示（可指定种子）
//! - `HttpProvider`：把文件元数据 POST 到真实的检测服务

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::ProviderError;
use crate::models::{AnalysisResult, Percentage, SubmittedArtifact};

/// 外部分析服务
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, artifact: &SubmittedArtifact) -> Result<AnalysisResult, ProviderError>;

    /// 用于日志显示的名称
    fn name(&self) -> &str;
}

/// 根据配置选择 Provider：配置了 endpoint 则走 HTTP，否则使用模拟服务
pub fn build_provider(config: &Config) -> Arc<dyn AnalysisProvider> {
    match &config.analysis_endpoint {
        Some(endpoint) => {
            info!("🌐 使用远程分析服务: {}", endpoint);
            Arc::new(HttpProvider::new(endpoint.clone()))
        }
        None => {
            info!(
                "🎲 未配置分析服务，使用模拟结果 (延迟 {}ms)",
                config.simulated_latency_ms
            );
            Arc::new(SimulatedProvider::new(
                Duration::from_millis(config.simulated_latency_ms),
                config.simulator_seed,
            ))
        }
    }
}

const SIMULATED_PATTERNS: [&str; 5] = [
    "Repetitive phrasing",
    "Unusual sentence structure",
    "Generic vocabulary",
    "Artificial patterns",
    "Inconsistent style",
];

/// 模拟分析服务
///
/// 同一个种子、同一个调用序号总是产生相同的结果。
pub struct SimulatedProvider {
    latency: Duration,
    seed: u64,
    calls: AtomicU64,
}

impl SimulatedProvider {
    pub fn new(latency: Duration, seed: Option<u64>) -> Self {
        Self {
            latency,
            seed: seed.unwrap_or_else(rand::random),
            calls: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl AnalysisProvider for SimulatedProvider {
    async fn analyze(&self, artifact: &SubmittedArtifact) -> Result<AnalysisResult, ProviderError> {
        tokio::time::sleep(self.latency).await;

        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(call));
        let pattern_count: usize = rng.gen_range(1..=3);

        let result = AnalysisResult {
            ai_probability: Percentage::clamped(rng.gen_range(0..100)),
            confidence: Percentage::clamped(rng.gen_range(70..100)),
            file_name: artifact.name().to_string(),
            unit_count: rng.gen_range(200..1200),
            detected_patterns: SIMULATED_PATTERNS[..pattern_count]
                .iter()
                .map(|p| p.to_string())
                .collect(),
        };
        debug!("模拟分析第 {} 次调用: {:?}", call + 1, result);

        Ok(result)
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

/// HTTP 分析服务
///
/// 请求体为文件元数据 `{name, sizeBytes, mimeType}`，响应体为 `AnalysisResult`。
/// 连接失败或非 2xx 状态返回 `Request`，响应体无法解析为结果时返回 `Rejected`。
/// 超时由编排层统一控制。
pub struct HttpProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    fn request_failed(&self, source: reqwest::Error) -> ProviderError {
        ProviderError::Request {
            endpoint: self.endpoint.clone(),
            source,
        }
    }
}

#[async_trait]
impl AnalysisProvider for HttpProvider {
    async fn analyze(&self, artifact: &SubmittedArtifact) -> Result<AnalysisResult, ProviderError> {
        debug!("POST {} ({})", self.endpoint, artifact);

        let response = self
            .client
            .post(&self.endpoint)
            .json(artifact)
            .send()
            .await
            .map_err(|e| self.request_failed(e))?
            .error_for_status()
            .map_err(|e| self.request_failed(e))?;

        let body = response.text().await.map_err(|e| self.request_failed(e))?;
        serde_json::from_str::<AnalysisResult>(&body).map_err(|e| {
            ProviderError::Rejected(format!("{} 返回的结果无效: {}", self.endpoint, e))
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
