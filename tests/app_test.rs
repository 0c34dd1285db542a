mod common;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clarify::{App, Command, Config};
use common::FakeProvider;

fn test_config() -> Config {
    Config {
        feedback_duration_ms: 5,
        analysis_timeout_ms: 2_000,
        ..Config::default()
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("clarify-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn parses_commands() {
    let args = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    assert_eq!(Command::parse(args(&["quiz"])).unwrap(), Command::Quiz);
    assert_eq!(
        Command::parse(args(&["analyze", "a.txt", "b.pdf"])).unwrap(),
        Command::Analyze(vec![PathBuf::from("a.txt"), PathBuf::from("b.pdf")])
    );
    assert!(Command::parse(args(&["analyze"])).is_err());
    assert!(Command::parse(args(&["upload"])).is_err());
    assert!(Command::parse(args(&[])).is_err());
}

#[tokio::test]
async fn analyzes_supported_files_and_counts_failures() {
    let dir = scratch_dir("analyze");
    let essay = dir.join("essay.txt");
    let photo = dir.join("photo.png");
    std::fs::write(&essay, "Lorem ipsum dolor sit amet").unwrap();
    std::fs::write(&photo, [0u8; 16]).unwrap();
    let missing = dir.join("missing.pdf");

    let provider = Arc::new(FakeProvider::fixed(Duration::from_millis(5), 94));
    let app = App::with_provider(test_config(), provider.clone());

    let stats = app
        .analyze_files(&[essay, photo, missing])
        .await
        .unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.success, 1);
    assert_eq!(stats.failed, 2);
    assert_eq!(provider.started(), 1, "只有受支持的文件才会提交");

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn provider_failure_counts_as_failed_analysis() {
    let dir = scratch_dir("failure");
    let essay = dir.join("essay.docx");
    std::fs::write(&essay, "x").unwrap();

    let provider = Arc::new(FakeProvider::failing(Duration::ZERO, "boom"));
    let app = App::with_provider(test_config(), provider);

    let stats = app.analyze_files(&[essay]).await.unwrap();
    assert_eq!(stats.success, 0);
    assert_eq!(stats.failed, 1);

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn quiz_reads_answers_until_finished() {
    let provider = Arc::new(FakeProvider::fixed(Duration::ZERO, 0));
    let app = App::with_provider(test_config(), provider);

    let input: &[u8] = b"real\nmaybe\nf\nr\nfake\nf\n";
    let mut output = Vec::new();
    let summary = app.play_quiz(input, &mut output).await.unwrap().unwrap();

    assert_eq!(summary.score, 4);
    assert_eq!(summary.total, 5);

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Question 1/5"));
    assert!(text.contains("无法识别的输入"));
    assert!(text.contains("Correct!"));
    assert!(text.contains("Incorrect"));
    assert!(text.contains("Challenge Complete! 4/5 (80% Correct)"));
}

#[tokio::test]
async fn quiz_restart_and_early_exit() {
    let provider = Arc::new(FakeProvider::fixed(Duration::ZERO, 0));
    let app = App::with_provider(test_config(), provider);

    let input: &[u8] = b"r\nrestart\nq\n";
    let mut output = Vec::new();
    let summary = app.play_quiz(input, &mut output).await.unwrap();
    assert!(summary.is_none());

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Restarted"));
    // 重新开始后回到第 1 题
    assert_eq!(text.matches("Question 1/5").count(), 2);
}

#[tokio::test]
async fn quiz_uses_question_file_from_config() {
    let dir = scratch_dir("quizfile");
    let path = dir.join("questions.toml");
    std::fs::write(
        &path,
        r#"
[[questions]]
id = 1
image_ref = "dog.jpg"
is_real = false
explanation = "Fur melts into the background."
"#,
    )
    .unwrap();

    let config = Config {
        quiz_file: Some(path.display().to_string()),
        ..test_config()
    };
    let app = App::with_provider(config, Arc::new(FakeProvider::fixed(Duration::ZERO, 0)));

    let input: &[u8] = b"ai\n";
    let mut output = Vec::new();
    let summary = app.play_quiz(input, &mut output).await.unwrap().unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.score, 1);

    std::fs::remove_dir_all(dir).ok();
}
