//! 文件分析流程 - 流程层
//!
//! 状态机：`Idle → Pending → Completed | Failed`
//!
//! - 同一时间最多一个请求在途，在途时再次提交返回 `RequestInFlight`
//! - Provider 调用在独立任务中执行，结果经 channel 送回，由流程的持有者逐条处理
//! - `Completed` / `Failed` 对下一次提交而言等同于 `Idle`
//! - 放弃（`abandon`）后在途调用仍会执行完，但结果按请求编号被丢弃
//!
//! `submit` 会调用 `tokio::spawn`，必须在 tokio 运行时内使用。

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{AnalysisError, AppResult, ValidationError};
use crate::models::{
    AnalysisRequest, AnalysisResult, ArtifactCandidate, RequestId, SubmittedArtifact,
};
use crate::services::{classify, validate, AnalysisProvider, Classification};

/// 分析流程状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisState {
    Idle,
    Pending {
        request: AnalysisRequest,
    },
    Completed {
        request_id: RequestId,
        result: AnalysisResult,
        classification: Classification,
    },
    Failed {
        request_id: RequestId,
        error: AnalysisError,
    },
}

/// 状态标签（用于快照）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStateTag {
    Idle,
    Pending,
    Completed,
    Failed,
}

impl AnalysisState {
    pub fn tag(&self) -> AnalysisStateTag {
        match self {
            AnalysisState::Idle => AnalysisStateTag::Idle,
            AnalysisState::Pending { .. } => AnalysisStateTag::Pending,
            AnalysisState::Completed { .. } => AnalysisStateTag::Completed,
            AnalysisState::Failed { .. } => AnalysisStateTag::Failed,
        }
    }

    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            AnalysisState::Idle => None,
            AnalysisState::Pending { request } => Some(request.id),
            AnalysisState::Completed { request_id, .. }
            | AnalysisState::Failed { request_id, .. } => Some(*request_id),
        }
    }
}

/// 展示层使用的只读快照
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSnapshot {
    pub state: AnalysisStateTag,
    pub request_id: Option<RequestId>,
    pub selected: Option<SubmittedArtifact>,
    pub result: Option<AnalysisResult>,
    pub classification: Option<Classification>,
    pub error: Option<String>,
}

/// Provider 任务送回的结果
#[derive(Debug)]
struct ProviderOutcome {
    request_id: RequestId,
    outcome: Result<AnalysisResult, AnalysisError>,
}

/// 文件分析流程
pub struct AnalysisFlow {
    provider: Arc<dyn AnalysisProvider>,
    timeout: Duration,
    state: AnalysisState,
    selected: Option<SubmittedArtifact>,
    last_request_id: u64,
    outcome_tx: mpsc::UnboundedSender<ProviderOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<ProviderOutcome>,
}

impl AnalysisFlow {
    pub fn new(provider: Arc<dyn AnalysisProvider>, timeout: Duration) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            provider,
            timeout,
            state: AnalysisState::Idle,
            selected: None,
            last_request_id: 0,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, AnalysisState::Pending { .. })
    }

    pub fn result(&self) -> Option<(&AnalysisResult, &Classification)> {
        match &self.state {
            AnalysisState::Completed {
                result,
                classification,
                ..
            } => Some((result, classification)),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match &self.state {
            AnalysisState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    // ========== 文件选择 ==========

    pub fn selected(&self) -> Option<&SubmittedArtifact> {
        self.selected.as_ref()
    }

    /// 校验并替换当前选择的文件
    ///
    /// 请求在途时不能更换文件；被拒绝或校验失败时保留原来的选择。
    pub fn select(&mut self, candidates: &[ArtifactCandidate]) -> AppResult<&SubmittedArtifact> {
        self.ensure_not_pending()?;
        let artifact = validate(candidates)?;
        info!("📄 已选择文件: {}", artifact);
        let selected = self.selected.insert(artifact);
        Ok(&*selected)
    }

    /// 清除当前选择的文件
    pub fn remove_artifact(&mut self) -> Option<SubmittedArtifact> {
        let removed = self.selected.take();
        if let Some(artifact) = &removed {
            debug!("已移除文件: {}", artifact.name());
        }
        removed
    }

    // ========== 提交 ==========

    /// 提交当前选择的文件，提交后清空选择
    pub fn submit_selected(&mut self) -> AppResult<RequestId> {
        self.ensure_not_pending()?;
        let artifact = self.selected.take().ok_or(ValidationError::NoArtifact)?;
        Ok(self.submit(artifact)?)
    }

    /// 提交一个文件进行分析，Provider 只会被调用一次
    pub fn submit(&mut self, artifact: SubmittedArtifact) -> Result<RequestId, AnalysisError> {
        self.ensure_not_pending()?;

        self.last_request_id += 1;
        let request = AnalysisRequest {
            id: RequestId(self.last_request_id),
            artifact,
        };
        info!("📤 提交分析请求 #{}: {}", request.id, request.artifact);

        self.spawn_provider_call(&request);
        let request_id = request.id;
        self.state = AnalysisState::Pending { request };

        Ok(request_id)
    }

    fn ensure_not_pending(&self) -> Result<(), AnalysisError> {
        match &self.state {
            AnalysisState::Pending { request } => {
                warn!("⚠️ 请求 #{} 仍在分析中，拒绝新的提交", request.id);
                Err(AnalysisError::RequestInFlight {
                    request_id: request.id,
                })
            }
            _ => Ok(()),
        }
    }

    fn spawn_provider_call(&self, request: &AnalysisRequest) {
        let provider = Arc::clone(&self.provider);
        let outcome_tx = self.outcome_tx.clone();
        let timeout = self.timeout;
        let request_id = request.id;
        let artifact = request.artifact.clone();

        tokio::spawn(async move {
            let outcome = match tokio::time::timeout(timeout, provider.analyze(&artifact)).await
            {
                Ok(Ok(result)) => Ok(result),
                Ok(Err(e)) => Err(AnalysisError::from(e)),
                Err(_) => Err(AnalysisError::ProviderTimeout { timeout }),
            };
            // 接收端只会随流程一起释放，此时结果已无人关心
            let _ = outcome_tx.send(ProviderOutcome {
                request_id,
                outcome,
            });
        });
    }

    // ========== 结果处理 ==========

    /// 等待在途请求结束并返回最终状态；没有在途请求时立即返回
    pub async fn settle(&mut self) -> &AnalysisState {
        while self.is_pending() {
            match self.outcome_rx.recv().await {
                Some(outcome) => {
                    self.apply(outcome);
                }
                None => break,
            }
        }
        &self.state
    }

    /// 处理已经到达的结果，不等待；返回状态是否发生变化
    pub fn poll_outcomes(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            changed |= self.apply(outcome);
        }
        changed
    }

    /// 放弃在途请求，回到 `Idle`
    ///
    /// Provider 调用不会被中断，但它的结果不会再引起任何状态变化。
    pub fn abandon(&mut self) -> bool {
        match &self.state {
            AnalysisState::Pending { request } => {
                info!("↩️ 放弃分析请求 #{}", request.id);
                self.state = AnalysisState::Idle;
                true
            }
            _ => false,
        }
    }

    fn apply(&mut self, outcome: ProviderOutcome) -> bool {
        let ProviderOutcome {
            request_id,
            outcome,
        } = outcome;

        match &self.state {
            AnalysisState::Pending { request } if request.id == request_id => {}
            _ => {
                debug!("丢弃过期的分析结果 #{}", request_id);
                return false;
            }
        }

        self.state = match outcome {
            Ok(result) => {
                let classification = classify(result.ai_probability);
                info!(
                    "✓ 请求 #{} 分析完成: {} ({})",
                    request_id, result.ai_probability, classification.label
                );
                AnalysisState::Completed {
                    request_id,
                    result,
                    classification,
                }
            }
            Err(error) => {
                warn!("❌ 请求 #{} 分析失败: {}", request_id, error);
                AnalysisState::Failed { request_id, error }
            }
        };
        true
    }

    pub fn snapshot(&self) -> AnalysisSnapshot {
        let (result, classification) = match self.result() {
            Some((result, classification)) => (Some(result.clone()), Some(*classification)),
            None => (None, None),
        };
        AnalysisSnapshot {
            state: self.state.tag(),
            request_id: self.state.request_id(),
            selected: self.selected.clone(),
            result,
            classification,
            error: self.error().map(|e| e.to_string()),
        }
    }
}
