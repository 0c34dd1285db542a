pub mod analysis_flow;
pub mod quiz_flow;

pub use analysis_flow::{AnalysisFlow, AnalysisSnapshot, AnalysisState, AnalysisStateTag};
pub use quiz_flow::{AnswerFeedback, QuizEngine, QuizSnapshot, QuizSummary, ScoreTier};
