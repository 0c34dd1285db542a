use crate::models::quiz::QuizQuestion;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 题目文件结构
///
/// ```toml
/// [[questions]]
/// id = 1
/// image_ref = "images/image_1.png"
/// is_real = true
/// explanation = "..."
/// ```
#[derive(Debug, Deserialize)]
struct QuizFile {
    questions: Vec<QuizQuestion>,
}

/// 从 TOML 文件加载题目列表
pub async fn load_quiz_questions(toml_file_path: &Path) -> Result<Vec<QuizQuestion>> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取题目文件: {}", toml_file_path.display()))?;

    let questions = parse_quiz_questions(&content)
        .with_context(|| format!("无法解析题目文件: {}", toml_file_path.display()))?;

    tracing::info!(
        "成功加载 {} 道题目: {}",
        questions.len(),
        toml_file_path.display()
    );

    Ok(questions)
}

/// 解析 TOML 文本形式的题目列表
pub fn parse_quiz_questions(content: &str) -> Result<Vec<QuizQuestion>> {
    let file: QuizFile = toml::from_str(content)?;

    if file.questions.is_empty() {
        anyhow::bail!("题目文件中没有任何题目");
    }

    Ok(file.questions)
}

/// 内置的五道挑战题
pub fn default_questions() -> Vec<QuizQuestion> {
    let raw = [
        (
            1,
            "images/image_1.png",
            true,
            "This image shows natural lighting inconsistencies and organic details typical of real photography.",
        ),
        (
            2,
            "images/image_2.png",
            false,
            "Notice the overly perfect symmetry and unnatural skin texture - classic signs of AI generation.",
        ),
        (
            3,
            "images/image_3.png",
            true,
            "The background blur and natural imperfections indicate this was captured by a real camera.",
        ),
        (
            4,
            "images/image_4.png",
            false,
            "The hands show anatomical inconsistencies common in AI-generated images.",
        ),
        (
            5,
            "images/image_5.jpg",
            true,
            "The lighting setup and natural wear patterns suggest genuine photography.",
        ),
    ];

    raw.into_iter()
        .map(|(id, image_ref, is_real, explanation)| QuizQuestion {
            id,
            image_ref: image_ref.to_string(),
            is_real,
            explanation: explanation.to_string(),
        })
        .collect()
}
