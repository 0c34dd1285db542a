//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (命令、批量、统计)
//!     ↓
//! workflow (AnalysisFlow / QuizEngine 状态机)
//!     ↓
//! services (校验 / 分级 / 分析服务)
//!     ↓
//! models (数据结构、题目加载)
//! ```
//!
//! 只有编排层持有 `Config` 和具体的分析服务，下层都通过参数注入。

pub mod app;

pub use app::{AnalysisStats, App, Command};
