use serde::{Deserialize, Serialize};

/// 一道"真实 / AI 生成"判断题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct QuizQuestion {
    pub id: u32,
    /// 图片引用（路径或 URL），引擎不解析
    pub image_ref: String,
    pub is_real: bool,
    pub explanation: String,
}

impl QuizQuestion {
    /// 该图片的真实类别描述
    pub fn truth_label(&self) -> &'static str {
        if self.is_real {
            "REAL"
        } else {
            "AI-generated"
        }
    }
}

/// 答题阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum QuizPhase {
    Intro,
    #[serde(rename_all = "camelCase")]
    Playing {
        current_index: usize,
        /// 用户在当前题目上的选择；`Some` 表示正在显示反馈
        pending_answer: Option<bool>,
    },
    Finished,
}

/// 一次答题会话
///
/// 只由 `workflow::QuizEngine` 修改，展示层只读。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSession {
    pub(crate) phase: QuizPhase,
    pub(crate) score: usize,
    pub(crate) answers: Vec<bool>,
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            phase: QuizPhase::Intro,
            score: 0,
            answers: Vec::new(),
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// 每道已答题目是否答对
    pub fn answers(&self) -> &[bool] {
        &self.answers
    }

    /// `Finished` 时停留在最后一题的下标
    pub fn current_index(&self) -> usize {
        match self.phase {
            QuizPhase::Intro => 0,
            QuizPhase::Playing { current_index, .. } => current_index,
            QuizPhase::Finished => self.answers.len().saturating_sub(1),
        }
    }

    pub fn pending_answer(&self) -> Option<bool> {
        match self.phase {
            QuizPhase::Playing { pending_answer, .. } => pending_answer,
            _ => None,
        }
    }

    pub fn feedback_visible(&self) -> bool {
        self.pending_answer().is_some()
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}
