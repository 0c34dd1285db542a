//! "真实 vs AI" 答题流程 - 流程层
//!
//! 状态机：`Intro → Playing → Finished`，`restart` 可从任意状态回到 `Intro`。
//!
//! 作答后显示反馈，固定时长后由计时器自动进入下一题。
//! 计时器携带调度时的代数（generation），`answer` / 计时推进 / `restart`
//! 都会让代数加一，过期的计时信号因代数不符被丢弃。

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::QuizError;
use crate::models::{QuizPhase, QuizQuestion, QuizSession};
use crate::services::TierTable;

/// 结束时的评语档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ScoreTier {
    TryAgain,
    NotBad,
    Good,
    Excellent,
}

/// 按正确率：>=80, >=60, >=40, 其余
const SCORE_TIERS: TierTable<f64, ScoreTier> = TierTable::new(&[
    (0.0, ScoreTier::TryAgain),
    (40.0, ScoreTier::NotBad),
    (60.0, ScoreTier::Good),
    (80.0, ScoreTier::Excellent),
]);

impl ScoreTier {
    pub fn for_percentage(percentage: f64) -> Self {
        SCORE_TIERS.pick(percentage)
    }

    pub fn message(self) -> &'static str {
        match self {
            ScoreTier::Excellent => "Excellent! You have a great eye for AI detection.",
            ScoreTier::Good => "Good job! With practice, you'll get even better.",
            ScoreTier::NotBad => "Not bad, but AI detection is trickier than you think!",
            ScoreTier::TryAgain => {
                "AI is getting sophisticated - let Clarify help you detect it!"
            }
        }
    }
}

/// 单题反馈
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    pub question_id: u32,
    pub user_says_real: bool,
    pub is_correct: bool,
    /// "REAL" 或 "AI-generated"
    pub truth: &'static str,
    pub explanation: String,
}

impl AnswerFeedback {
    pub fn verdict(&self) -> &'static str {
        if self.is_correct {
            "Correct!"
        } else {
            "Incorrect"
        }
    }
}

/// 结束汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub score: usize,
    pub total: usize,
    pub answers: Vec<bool>,
    /// 四舍五入后的正确率
    pub percentage: u32,
    pub tier: ScoreTier,
    pub message: &'static str,
}

/// 展示层使用的只读快照
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSnapshot {
    pub session: QuizSession,
    pub total_questions: usize,
    pub current_question: Option<QuizQuestion>,
    pub feedback: Option<AnswerFeedback>,
    pub summary: Option<QuizSummary>,
}

#[derive(Debug)]
struct AdvanceTick {
    generation: u64,
}

/// 答题引擎
///
/// 单一持有者：所有状态变化都经由 `&mut self` 方法，计时器任务只发送信号。
pub struct QuizEngine {
    questions: Arc<[QuizQuestion]>,
    feedback_duration: Duration,
    session: QuizSession,
    generation: u64,
    timer: Option<JoinHandle<()>>,
    tick_tx: mpsc::UnboundedSender<AdvanceTick>,
    tick_rx: mpsc::UnboundedReceiver<AdvanceTick>,
}

impl QuizEngine {
    pub fn new(questions: Vec<QuizQuestion>, feedback_duration: Duration) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyQuestionSet);
        }
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        Ok(Self {
            questions: questions.into(),
            feedback_duration,
            session: QuizSession::new(),
            generation: 0,
            timer: None,
            tick_tx,
            tick_rx,
        })
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// 是否有尚未触发的自动推进
    pub fn advance_scheduled(&self) -> bool {
        self.timer.is_some()
    }

    /// 当前题目（仅 `Playing`）
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.session.phase {
            QuizPhase::Playing { current_index, .. } => self.questions.get(current_index),
            _ => None,
        }
    }

    /// 当前显示中的反馈
    pub fn feedback(&self) -> Option<AnswerFeedback> {
        let QuizPhase::Playing {
            current_index,
            pending_answer: Some(user_says_real),
        } = self.session.phase
        else {
            return None;
        };
        let question = &self.questions[current_index];
        Some(AnswerFeedback {
            question_id: question.id,
            user_says_real,
            is_correct: user_says_real == question.is_real,
            truth: question.truth_label(),
            explanation: question.explanation.clone(),
        })
    }

    // ========== 状态转换 ==========

    pub fn start(&mut self) -> Result<(), QuizError> {
        if self.session.phase != QuizPhase::Intro {
            return Err(QuizError::AlreadyStarted);
        }
        self.session.phase = QuizPhase::Playing {
            current_index: 0,
            pending_answer: None,
        };
        info!("🧠 挑战开始，共 {} 题", self.questions.len());
        Ok(())
    }

    /// 作答；反馈显示期间的重复作答被拒绝，状态不变
    pub fn answer(&mut self, user_says_real: bool) -> Result<AnswerFeedback, QuizError> {
        let QuizPhase::Playing {
            current_index,
            pending_answer,
        } = self.session.phase
        else {
            return Err(QuizError::NotPlaying);
        };
        if pending_answer.is_some() {
            debug!("第 {} 题正在显示反馈，忽略重复作答", current_index + 1);
            return Err(QuizError::FeedbackPending);
        }

        let is_correct = user_says_real == self.questions[current_index].is_real;
        self.session.answers.push(is_correct);
        if is_correct {
            self.session.score += 1;
        }
        self.session.phase = QuizPhase::Playing {
            current_index,
            pending_answer: Some(user_says_real),
        };
        info!(
            "第 {}/{} 题: {} (得分 {})",
            current_index + 1,
            self.questions.len(),
            if is_correct { "✓ 正确" } else { "✗ 错误" },
            self.session.score
        );

        self.schedule_advance();

        // phase 刚被设置为带反馈的 Playing
        self.feedback().ok_or(QuizError::NotPlaying)
    }

    /// 回到初始状态，取消尚未触发的自动推进
    pub fn restart(&mut self) {
        self.cancel_timer();
        self.generation += 1;
        self.session = QuizSession::new();
        info!("🔄 挑战已重置");
    }

    // ========== 计时器 ==========

    fn schedule_advance(&mut self) {
        self.cancel_timer();
        self.generation += 1;

        let generation = self.generation;
        let duration = self.feedback_duration;
        let tick_tx = self.tick_tx.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = tick_tx.send(AdvanceTick { generation });
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// 等待自动推进；没有待触发的计时器时立即返回 `false`
    pub async fn wait_for_advance(&mut self) -> bool {
        while self.timer.is_some() {
            match self.tick_rx.recv().await {
                Some(tick) => {
                    if self.apply_tick(tick) {
                        return true;
                    }
                }
                None => break,
            }
        }
        false
    }

    /// 处理已经到达的计时信号，不等待；返回是否发生了推进
    pub fn poll_timer(&mut self) -> bool {
        let mut advanced = false;
        while let Ok(tick) = self.tick_rx.try_recv() {
            advanced |= self.apply_tick(tick);
        }
        advanced
    }

    fn apply_tick(&mut self, tick: AdvanceTick) -> bool {
        if tick.generation != self.generation {
            debug!(
                "丢弃过期的计时信号 (代数 {}，当前 {})",
                tick.generation, self.generation
            );
            return false;
        }
        let QuizPhase::Playing {
            current_index,
            pending_answer: Some(_),
        } = self.session.phase
        else {
            return false;
        };

        self.timer = None;
        self.generation += 1;

        let next = current_index + 1;
        if next < self.questions.len() {
            self.session.phase = QuizPhase::Playing {
                current_index: next,
                pending_answer: None,
            };
        } else {
            self.session.phase = QuizPhase::Finished;
            info!(
                "🎉 挑战完成: {}/{}",
                self.session.score,
                self.questions.len()
            );
        }
        true
    }

    // ========== 汇总 ==========

    /// 结束汇总（仅 `Finished`）
    pub fn summary(&self) -> Option<QuizSummary> {
        if self.session.phase != QuizPhase::Finished {
            return None;
        }
        let total = self.questions.len();
        let percentage = self.session.score as f64 / total as f64 * 100.0;
        let tier = ScoreTier::for_percentage(percentage);
        Some(QuizSummary {
            score: self.session.score,
            total,
            answers: self.session.answers.clone(),
            percentage: percentage.round() as u32,
            tier,
            message: tier.message(),
        })
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            session: self.session.clone(),
            total_questions: self.questions.len(),
            current_question: self.current_question().cloned(),
            feedback: self.feedback(),
            summary: self.summary(),
        }
    }
}

impl Drop for QuizEngine {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
