pub mod analysis;
pub mod artifact;
pub mod loaders;
pub mod quiz;

pub use analysis::{AnalysisRequest, AnalysisResult, Percentage, RequestId};
pub use artifact::{ArtifactCandidate, SubmittedArtifact};
pub use loaders::{default_questions, load_quiz_questions};
pub use quiz::{QuizPhase, QuizQuestion, QuizSession};
