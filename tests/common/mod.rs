#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use clarify::error::ProviderError;
use clarify::models::{AnalysisResult, Percentage};
use clarify::{validate, AnalysisProvider, ArtifactCandidate, SubmittedArtifact};

type Responder = dyn Fn(&SubmittedArtifact) -> Result<AnalysisResult, ProviderError> + Send + Sync;

/// 可控的分析服务：固定延迟，按文件名返回结果
pub struct FakeProvider {
    delay: Duration,
    respond: Box<Responder>,
    started: AtomicUsize,
    finished: AtomicUsize,
}

impl FakeProvider {
    pub fn new(
        delay: Duration,
        respond: impl Fn(&SubmittedArtifact) -> Result<AnalysisResult, ProviderError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            delay,
            respond: Box::new(respond),
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        }
    }

    /// 总是返回 `probability`
    pub fn fixed(delay: Duration, probability: u8) -> Self {
        Self::new(delay, move |artifact| Ok(result_for(artifact.name(), probability)))
    }

    pub fn failing(delay: Duration, message: &'static str) -> Self {
        Self::new(delay, move |_| Err(ProviderError::Rejected(message.to_string())))
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisProvider for FakeProvider {
    async fn analyze(&self, artifact: &SubmittedArtifact) -> Result<AnalysisResult, ProviderError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        let result = (self.respond)(artifact);
        self.finished.fetch_add(1, Ordering::SeqCst);
        result
    }

    fn name(&self) -> &str {
        "fake"
    }
}

pub fn result_for(file_name: &str, probability: u8) -> AnalysisResult {
    AnalysisResult {
        ai_probability: Percentage::new(probability).unwrap(),
        confidence: Percentage::new(88).unwrap(),
        file_name: file_name.to_string(),
        unit_count: 530,
        detected_patterns: vec!["Repetitive phrasing".to_string()],
    }
}

pub fn artifact(name: &str) -> SubmittedArtifact {
    validate(&[ArtifactCandidate::new(name, 2048, "text/plain")]).unwrap()
}
