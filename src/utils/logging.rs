/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::services::Classification;
use crate::models::AnalysisResult;
use crate::workflow::QuizSummary;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；未设置时按 `verbose` 选择 debug / info。
/// 重复调用是安全的（测试中会多次调用）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "clarify=debug" } else { "clarify=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 Clarify 启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("⏱️ 分析超时: {}ms", config.analysis_timeout_ms);
    info!("⏱️ 答题反馈时长: {}ms", config.feedback_duration_ms);
    info!("{}", "=".repeat(60));
}

/// 记录分析结果
pub fn log_analysis_result(result: &AnalysisResult, classification: &Classification) {
    info!("\n{}", "─".repeat(60));
    info!("📄 文件: {}", truncate_text(&result.file_name, 40));
    info!(
        "🤖 AI 概率: {} → {}",
        result.ai_probability, classification.label
    );
    info!("🎯 置信度: {}", result.confidence);
    info!("📝 分析字数: {}", result.unit_count);
    if !result.detected_patterns.is_empty() {
        info!("🔎 检测到的特征: {}", result.detected_patterns.join(", "));
    }
    info!("{}", "─".repeat(60));
}

/// 记录答题汇总
pub fn log_quiz_summary(summary: &QuizSummary) {
    let marks: String = summary
        .answers
        .iter()
        .map(|correct| if *correct { '✓' } else { '✗' })
        .collect();
    info!("\n{}", "=".repeat(60));
    info!(
        "🎉 挑战完成: {}/{} ({}%)",
        summary.score, summary.total, summary.percentage
    );
    info!("📋 作答: {}", marks);
    info!("💬 {}", summary.message);
    info!("{}", "=".repeat(60));
}

/// 打印批量分析的最终统计
pub fn print_final_stats(success: usize, failed: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部分析完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_characters() {
        assert_eq!(truncate_text("论文初稿最终版.docx", 4), "论文初稿...");
        assert_eq!(truncate_text("essay.txt", 40), "essay.txt");
    }
}
