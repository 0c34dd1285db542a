//! 应用驱动 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：输出启动信息、按配置选择分析服务
//! 2. **批量分析**：逐个文件走完 选择 → 提交 → 等待结果，同一时间只有一个请求在途
//! 3. **答题挑战**：从输入读取 REAL / FAKE，驱动答题引擎直到结束
//! 4. **全局统计**：汇总成功 / 失败数量
//!
//! 本层不做任何分级或计分判断，只做调度、输出和统计。

use crate::config::Config;
use crate::models::{
    default_questions, load_quiz_questions, ArtifactCandidate, QuizPhase, QuizQuestion,
};
use crate::services::{build_provider, guess_mime_type, AnalysisProvider};
use crate::utils::logging::{log_analysis_result, log_quiz_summary, log_startup, print_final_stats};
use crate::workflow::{AnalysisFlow, AnalysisState, QuizEngine, QuizSummary};
use anyhow::{bail, Context, Result};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info, warn};

/// 命令行命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 逐个分析文件
    Analyze(Vec<PathBuf>),
    /// 从标准输入进行答题挑战
    Quiz,
}

impl Command {
    pub const USAGE: &'static str = "用法: clarify analyze <文件>... | clarify quiz";

    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut args = args.into_iter();
        match args.next().as_deref() {
            Some("analyze") => {
                let paths: Vec<PathBuf> = args.map(PathBuf::from).collect();
                if paths.is_empty() {
                    bail!("analyze 至少需要一个文件\n{}", Self::USAGE);
                }
                Ok(Command::Analyze(paths))
            }
            Some("quiz") => Ok(Command::Quiz),
            Some(other) => bail!("未知命令: {}\n{}", other, Self::USAGE),
            None => bail!("{}", Self::USAGE),
        }
    }
}

/// 批量分析统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

/// 应用主结构
pub struct App {
    config: Config,
    provider: Arc<dyn AnalysisProvider>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);
        let provider = build_provider(&config);
        info!("🔌 分析服务: {}", provider.name());
        Ok(Self::with_provider(config, provider))
    }

    /// 使用指定的分析服务创建应用
    pub fn with_provider(config: Config, provider: Arc<dyn AnalysisProvider>) -> Self {
        Self { config, provider }
    }

    /// 运行命令
    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Analyze(paths) => {
                let stats = self.analyze_files(&paths).await?;
                print_final_stats(stats.success, stats.failed, stats.total);
            }
            Command::Quiz => {
                let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                let stdout = tokio::io::stdout();
                self.play_quiz(stdin, stdout).await?;
            }
        }
        Ok(())
    }

    /// 逐个分析文件，结果快照以 JSON 输出到标准输出
    pub async fn analyze_files(&self, paths: &[PathBuf]) -> Result<AnalysisStats> {
        info!("\n📁 正在读取 {} 个文件的信息...", paths.len());
        let candidates = join_all(paths.iter().map(|path| candidate_from_path(path))).await;

        let mut flow = AnalysisFlow::new(Arc::clone(&self.provider), self.config.analysis_timeout());
        let mut stats = AnalysisStats {
            total: paths.len(),
            ..Default::default()
        };

        for (path, candidate) in paths.iter().zip(candidates) {
            let candidate = match candidate {
                Ok(candidate) => candidate,
                Err(e) => {
                    error!("❌ {:#}", e);
                    stats.failed += 1;
                    continue;
                }
            };

            if let Err(e) = flow.select(std::slice::from_ref(&candidate)) {
                warn!("⚠️ 跳过 {}: {}", path.display(), e);
                stats.failed += 1;
                continue;
            }

            flow.submit_selected()?;
            match flow.settle().await {
                AnalysisState::Completed {
                    result,
                    classification,
                    ..
                } => {
                    log_analysis_result(result, classification);
                    stats.success += 1;
                }
                AnalysisState::Failed { error, .. } => {
                    error!("❌ {} 分析失败: {}", path.display(), error);
                    stats.failed += 1;
                }
                AnalysisState::Idle | AnalysisState::Pending { .. } => {
                    stats.failed += 1;
                }
            }

            println!("{}", serde_json::to_string_pretty(&flow.snapshot())?);
        }

        Ok(stats)
    }

    /// 加载题目：配置了题目文件则读取文件，否则使用内置题目
    pub async fn load_questions(&self) -> Result<Vec<QuizQuestion>> {
        match &self.config.quiz_file {
            Some(path) => load_quiz_questions(Path::new(path)).await,
            None => Ok(default_questions()),
        }
    }

    /// 答题挑战
    ///
    /// 每行一个回答：`r` / `real` 表示真实，`f` / `fake` / `ai` 表示 AI 生成，
    /// `restart` 重新开始，`q` / `quit` 退出。输入结束或退出时返回 `None`。
    pub async fn play_quiz<R, W>(&self, input: R, mut output: W) -> Result<Option<QuizSummary>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let questions = self.load_questions().await?;
        let mut engine = QuizEngine::new(questions, self.config.feedback_duration())
            .context("无法创建答题挑战")?;
        let mut lines = input.lines();

        write_line(&mut output, "🧠 Real vs AI Challenge").await?;
        engine.start()?;

        loop {
            if engine.session().phase() == QuizPhase::Finished {
                break;
            }
            if engine.session().phase() == QuizPhase::Intro {
                engine.start()?;
            }

            if let Some(question) = engine.current_question() {
                let prompt = format!(
                    "Question {}/{} [{}] Score: {}\nIs this image REAL or AI-generated? [r/f]",
                    engine.session().current_index() + 1,
                    engine.total_questions(),
                    question.image_ref,
                    engine.session().score()
                );
                write_line(&mut output, &prompt).await?;
            }

            let Some(line) = lines.next_line().await? else {
                info!("输入结束，退出挑战");
                return Ok(None);
            };

            let user_says_real = match line.trim().to_ascii_lowercase().as_str() {
                "r" | "real" => true,
                "f" | "fake" | "ai" => false,
                "restart" => {
                    engine.restart();
                    write_line(&mut output, "🔄 Restarted").await?;
                    continue;
                }
                "q" | "quit" => return Ok(None),
                other => {
                    write_line(&mut output, &format!("无法识别的输入: {:?}", other)).await?;
                    continue;
                }
            };

            let feedback = match engine.answer(user_says_real) {
                Ok(feedback) => feedback,
                Err(e) => {
                    write_line(&mut output, &e.to_string()).await?;
                    continue;
                }
            };
            let text = format!(
                "{} This image is {}\nExplanation: {}",
                feedback.verdict(),
                feedback.truth,
                feedback.explanation
            );
            write_line(&mut output, &text).await?;

            engine.wait_for_advance().await;
        }

        let summary = engine
            .summary()
            .context("挑战已结束但没有汇总信息")?;
        let text = format!(
            "🎉 Challenge Complete! {}/{} ({}% Correct)\n{}",
            summary.score, summary.total, summary.percentage, summary.message
        );
        write_line(&mut output, &text).await?;
        log_quiz_summary(&summary);

        Ok(Some(summary))
    }
}

/// 从文件元数据构造候选文件（不读取内容）
async fn candidate_from_path(path: &Path) -> Result<ArtifactCandidate> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("无法读取文件信息: {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("无效的文件路径: {}", path.display()))?;
    let mime_type = guess_mime_type(&name);

    Ok(ArtifactCandidate::new(name, metadata.len(), mime_type))
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
