pub mod toml_loader;

pub use toml_loader::{default_questions, load_quiz_questions, parse_quiz_questions};
