use std::time::Duration;

use clarify::models::{default_questions, QuizPhase};
use clarify::workflow::ScoreTier;
use clarify::{QuizEngine, QuizError, QuizSession};
use tokio_test::{assert_err, assert_ok};

const FEEDBACK: Duration = Duration::from_secs(3);

fn engine() -> QuizEngine {
    QuizEngine::new(default_questions(), FEEDBACK).unwrap()
}

/// 依次作答并等待自动推进
async fn play(engine: &mut QuizEngine, answers: &[bool]) {
    for &answer in answers {
        assert_ok!(engine.answer(answer));
        assert!(engine.wait_for_advance().await);
    }
}

#[tokio::test(start_paused = true)]
async fn correct_first_answer_shows_feedback_and_ignores_repeat() {
    let mut engine = engine();
    assert_ok!(engine.start());

    let feedback = assert_ok!(engine.answer(true));
    assert!(feedback.is_correct);
    assert_eq!(feedback.verdict(), "Correct!");
    assert_eq!(feedback.truth, "REAL");

    let session = engine.session().clone();
    assert_eq!(session.score(), 1);
    assert_eq!(session.answers(), &[true]);
    assert!(session.feedback_visible());
    assert_eq!(session.pending_answer(), Some(true));

    assert_eq!(assert_err!(engine.answer(false)), QuizError::FeedbackPending);
    assert_eq!(engine.session(), &session);
}

#[tokio::test(start_paused = true)]
async fn commands_outside_their_state_are_rejected() {
    let mut engine = engine();
    assert_eq!(assert_err!(engine.answer(true)), QuizError::NotPlaying);
    assert_eq!(engine.session(), &QuizSession::new());

    assert_ok!(engine.start());
    assert_eq!(assert_err!(engine.start()), QuizError::AlreadyStarted);
}

#[tokio::test(start_paused = true)]
async fn timer_advances_after_feedback_duration() {
    let mut engine = engine();
    engine.start().unwrap();
    engine.answer(false).unwrap();
    assert!(engine.advance_scheduled());

    tokio::time::sleep(FEEDBACK - Duration::from_millis(1)).await;
    tokio::task::yield_now().await;
    assert!(!engine.poll_timer());
    assert_eq!(engine.session().current_index(), 0);

    tokio::time::sleep(Duration::from_millis(2)).await;
    tokio::task::yield_now().await;
    assert!(engine.poll_timer());

    let session = engine.session();
    assert_eq!(
        session.phase(),
        QuizPhase::Playing {
            current_index: 1,
            pending_answer: None
        }
    );
    assert_eq!(session.answers(), &[false]);
    assert_eq!(session.score(), 0);
    assert!(!engine.advance_scheduled());

    // 每道题只推进一次
    tokio::time::sleep(FEEDBACK * 2).await;
    assert!(!engine.poll_timer());
    assert_eq!(engine.session().current_index(), 1);
}

#[tokio::test(start_paused = true)]
async fn wait_for_advance_without_timer_returns_immediately() {
    let mut engine = engine();
    assert!(!engine.wait_for_advance().await);
    engine.start().unwrap();
    assert!(!engine.wait_for_advance().await);
}

#[tokio::test(start_paused = true)]
async fn four_correct_out_of_five_is_excellent() {
    let mut engine = engine();
    engine.start().unwrap();
    // 正确答案: real, fake, real, fake, real
    play(&mut engine, &[true, false, true, false, false]).await;

    assert_eq!(engine.session().phase(), QuizPhase::Finished);
    let summary = engine.summary().unwrap();
    assert_eq!(summary.score, 4);
    assert_eq!(summary.total, 5);
    assert_eq!(summary.answers, vec![true, true, true, true, false]);
    assert_eq!(summary.percentage, 80);
    assert_eq!(summary.tier, ScoreTier::Excellent);
}

#[tokio::test(start_paused = true)]
async fn three_correct_out_of_five_is_good_job() {
    let mut engine = engine();
    engine.start().unwrap();
    play(&mut engine, &[true, false, true, true, false]).await;

    let summary = engine.summary().unwrap();
    assert_eq!(summary.score, 3);
    assert_eq!(summary.percentage, 60);
    assert_eq!(summary.tier, ScoreTier::Good);
    assert!(summary.message.starts_with("Good job!"));
}

#[tokio::test(start_paused = true)]
async fn score_matches_answers_for_every_replay() {
    let truth = [true, false, true, false, true];

    for pattern in 0u32..32 {
        let answers: Vec<bool> = (0..5).map(|i| pattern & (1 << i) != 0).collect();
        let mut engine = engine();
        engine.start().unwrap();

        for &answer in &answers {
            let session = engine.session();
            assert_eq!(session.answers().len(), session.current_index());
            engine.answer(answer).unwrap();
            engine.wait_for_advance().await;
        }

        let session = engine.session();
        assert_eq!(session.phase(), QuizPhase::Finished);
        assert_eq!(session.answers().len(), 5);
        assert_eq!(
            session.score(),
            session.answers().iter().filter(|c| **c).count()
        );
        let expected = answers.iter().zip(truth).filter(|(a, t)| **a == *t).count();
        assert_eq!(session.score(), expected);
    }
}

#[tokio::test(start_paused = true)]
async fn restart_from_any_state_equals_fresh_session() {
    let fresh = QuizSession::new();

    // Intro
    let mut engine = engine();
    engine.restart();
    assert_eq!(engine.session(), &fresh);

    // Playing，反馈显示中
    engine.start().unwrap();
    engine.answer(true).unwrap();
    engine.restart();
    assert_eq!(engine.session(), &fresh);
    assert!(!engine.advance_scheduled());

    // 被取消的计时器不会再推进
    tokio::time::sleep(FEEDBACK * 2).await;
    assert!(!engine.poll_timer());
    assert_eq!(engine.session(), &fresh);

    // Finished
    engine.start().unwrap();
    play(&mut engine, &[true, true, true, true, true]).await;
    assert!(engine.summary().is_some());
    engine.restart();
    assert_eq!(engine.session(), &fresh);
    assert!(engine.summary().is_none());
}

#[tokio::test(start_paused = true)]
async fn stale_timer_cannot_advance_new_session_early() {
    let mut engine = engine();
    engine.start().unwrap();
    engine.answer(true).unwrap(); // 旧计时器在 3s 触发

    tokio::time::sleep(Duration::from_secs(1)).await;
    engine.restart();
    engine.start().unwrap();
    engine.answer(false).unwrap(); // 新计时器在 4s 触发

    tokio::time::sleep(Duration::from_millis(2500)).await;
    tokio::task::yield_now().await;
    assert!(!engine.poll_timer());
    assert!(engine.session().feedback_visible());
    assert_eq!(engine.session().current_index(), 0);

    assert!(engine.wait_for_advance().await);
    assert_eq!(engine.session().current_index(), 1);
    assert_eq!(engine.session().score(), 0);
}

#[tokio::test(start_paused = true)]
async fn snapshot_follows_phase() {
    let mut engine = engine();
    let intro = engine.snapshot();
    assert!(intro.current_question.is_none());
    assert_eq!(intro.total_questions, 5);

    engine.start().unwrap();
    engine.answer(false).unwrap();
    let playing = engine.snapshot();
    assert_eq!(playing.current_question.map(|q| q.id), Some(1));
    let feedback = playing.feedback.unwrap();
    assert_eq!(feedback.verdict(), "Incorrect");
    assert!(feedback.explanation.contains("natural lighting"));

    let json = serde_json::to_value(engine.snapshot()).unwrap();
    assert_eq!(json["session"]["phase"]["state"], "playing");
    assert_eq!(json["session"]["phase"]["pendingAnswer"], false);
    assert!(json["summary"].is_null());
}

#[test]
fn single_question_quiz_finishes_after_one_answer() {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap();

    rt.block_on(async {
        let questions = default_questions().into_iter().take(1).collect();
        let mut engine = QuizEngine::new(questions, FEEDBACK).unwrap();
        engine.start().unwrap();
        engine.answer(true).unwrap();
        assert!(engine.wait_for_advance().await);

        let summary = engine.summary().unwrap();
        assert_eq!(summary.percentage, 100);
        assert_eq!(summary.tier, ScoreTier::Excellent);
    });
}
