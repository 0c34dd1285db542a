//! # Clarify
//!
//! 内容真实性分析的核心流程：文件提交 → 分析 → 结果分级，以及"真实 vs AI"答题挑战。
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - 文件、分析结果、题目与答题会话
//! - `models::loaders` - 内置题目 / TOML 题目文件
//!
//! ### ② 业务能力层（Services）
//! - `validator` - 文件数量与类型校验
//! - `classifier` - AI 概率 → 严重程度
//! - `provider` - 外部分析服务（模拟 / HTTP）
//!
//! ### ③ 流程层（Workflow）
//! - `AnalysisFlow` - 提交 → 等待 → 完成 / 失败
//! - `QuizEngine` - 开始 → 作答 → 反馈 → 自动推进 → 汇总
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::App` - 命令行驱动，输出快照与统计
//!
//! 展示层不在本 crate 内，只通过 `snapshot()` 读取状态、调用文档中的命令。

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AnalysisError, AppError, AppResult, ErrorKind, QuizError, ValidationError};
pub use models::{AnalysisResult, ArtifactCandidate, QuizQuestion, QuizSession, SubmittedArtifact};
pub use orchestrator::{App, Command};
pub use services::{classify, validate, AnalysisProvider, SeverityBand};
pub use workflow::{AnalysisFlow, AnalysisState, QuizEngine};
