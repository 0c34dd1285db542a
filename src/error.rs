//! 错误类型
//!
//! 所有错误都是"可恢复"的：校验错误由用户重新选择文件恢复，
//! `RequestInFlight` 等待当前请求结束即可，Provider 失败则重新提交。
//! 本模块不做任何自动重试。

use std::time::Duration;

use thiserror::Error;

use crate::models::RequestId;

/// 错误种类（跨模块统一的判别标签）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ErrorKind {
    TooManyArtifacts,
    NoArtifact,
    UnsupportedType,
    RequestInFlight,
    ProviderFailure,
    ProviderTimeout,
    Quiz,
    Config,
}

/// 文件校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 一次提交了多个文件
    #[error("一次只能提交一个文件，收到 {count} 个")]
    TooManyArtifacts { count: usize },
    /// 没有可提交的文件
    #[error("没有选择文件")]
    NoArtifact,
    /// 不支持的文件类型
    #[error("不支持的文件类型: {mime_type}（支持 TXT, PDF, DOC, DOCX）")]
    UnsupportedType { mime_type: String },
}

/// 分析流程错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// 已有请求在处理中
    #[error("请求 #{request_id} 正在分析中，请等待结果")]
    RequestInFlight { request_id: RequestId },
    /// Provider 返回失败
    #[error("分析服务调用失败: {message}")]
    ProviderFailure { message: String },
    /// Provider 超时
    #[error("分析服务超时 ({}ms)", .timeout.as_millis())]
    ProviderTimeout { timeout: Duration },
}

impl From<ProviderError> for AnalysisError {
    fn from(err: ProviderError) -> Self {
        AnalysisError::ProviderFailure {
            message: err.to_string(),
        }
    }
}

/// Provider 实现内部的错误
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("请求 {endpoint} 失败: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{0}")]
    Rejected(String),
}

/// 答题流程错误
///
/// 这些都是"忽略"类错误：返回错误时会话状态不发生任何变化。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("题目列表为空")]
    EmptyQuestionSet,
    #[error("挑战已经开始")]
    AlreadyStarted,
    #[error("当前不在答题阶段")]
    NotPlaying,
    #[error("正在显示上一题的反馈，请稍候")]
    FeedbackPending,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件失败 ({path}): {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    #[error("分析错误: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("答题错误: {0}")]
    Quiz(#[from] QuizError),
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// 获取错误种类
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(ValidationError::TooManyArtifacts { .. }) => {
                ErrorKind::TooManyArtifacts
            }
            AppError::Validation(ValidationError::NoArtifact) => ErrorKind::NoArtifact,
            AppError::Validation(ValidationError::UnsupportedType { .. }) => {
                ErrorKind::UnsupportedType
            }
            AppError::Analysis(e) => e.kind(),
            AppError::Quiz(_) => ErrorKind::Quiz,
            AppError::Config(_) => ErrorKind::Config,
        }
    }
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::RequestInFlight { .. } => ErrorKind::RequestInFlight,
            AnalysisError::ProviderFailure { .. } => ErrorKind::ProviderFailure,
            AnalysisError::ProviderTimeout { .. } => ErrorKind::ProviderTimeout,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
