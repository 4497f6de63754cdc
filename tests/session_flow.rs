mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use quizdesk::api::SaveReceipt;
use quizdesk::error::SubmitError;
use quizdesk::navigation::Mode;
use quizdesk::results::{PageLayout, ResultStatus, ScoreSummary};
use quizdesk::session::{SubmitOutcome, SUBMIT_FAILED_ALERT};
use quizdesk::sync::SyncEvent;

use common::{session, settle, FakeBackend};

const GRADED: &str = r#"{"results": [
    {"id": "q1", "number": 1, "type": "choice", "text": "Which class builds a state graph?",
     "user_answer": "B", "correct_answer": "B", "is_correct": true,
     "explanation": "StateGraph is the entry point."},
    {"id": "q3", "number": 3, "type": "open", "text": "Explain a conditional edge.",
     "user_answer": "my thoughts", "explanation": "It routes on state."}
]}"#;

#[tokio::test(start_paused = true)]
async fn test_answer_and_submit_three_questions() {
    let backend = Arc::new(FakeBackend::with_submit_response(GRADED));
    let (mut session, mut events) = session(&backend);

    session.select_choice("q1", "B");
    session.update_open_answer("q3", "my thoughts");
    tokio::time::sleep(Duration::from_millis(1100)).await;
    settle(&mut session, &mut events).await;

    let progress = session.progress();
    assert_eq!((progress.answered, progress.total), (2, 3));
    assert!(session.is_marked(1));
    assert!(!session.is_marked(2));
    assert!(session.is_marked(3));

    let outcome = session.submit_with(|prompt| {
        assert_eq!(prompt.message(), "You answered 1 of 3 questions. Submit now?");
        true
    });
    assert_eq!(outcome, Ok(SubmitOutcome::Sent));
    assert!(session.is_submitting());
    settle(&mut session, &mut events).await;

    let submits = backend.submits();
    assert_eq!(submits.len(), 1);
    assert_eq!(submits[0].quiz_file, "quizzes/01_quiz_set1_graph_basics.md");
    let sent: Vec<(&str, &str)> = submits[0]
        .answers
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(sent, vec![("q1", "B")]);

    let saves = backend.saves();
    assert_eq!(saves.len(), 2);
    assert!(saves.iter().any(|s| s.question_id == "q3" && s.answer == "my thoughts"));

    let view = session.results().expect("results after submit");
    assert_eq!(view.summary.headline(), "Choice score: 1/1 (100%)");
    assert_eq!(view.summary.detail().as_deref(), Some("1 open question unscored"));
    assert_eq!(view.entries[0].status, ResultStatus::Correct);
    assert_eq!(view.entries[1].status, ResultStatus::Open);
    assert!(!session.is_submitting());
    assert_eq!(session.layout(), PageLayout::after_submit(Mode::Single));
    assert!(!session.layout().nav_grid_visible);
}

#[tokio::test(start_paused = true)]
async fn test_submit_needs_a_choice_answer() {
    let backend = Arc::new(FakeBackend::with_submit_response(GRADED));
    let (mut session, mut events) = session(&backend);

    session.update_open_answer("q3", "only prose");
    let mut asked = false;
    let outcome = session.submit_with(|_| {
        asked = true;
        true
    });
    assert_eq!(outcome, Err(SubmitError::NoChoiceAnswers));
    assert_eq!(
        SubmitError::NoChoiceAnswers.to_string(),
        "Please answer at least one question first!"
    );
    assert!(!asked);

    tokio::time::sleep(Duration::from_secs(2)).await;
    settle(&mut session, &mut events).await;
    assert!(backend.submits().is_empty());
    assert!(session.results().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_confirmation_sends_nothing() {
    let backend = Arc::new(FakeBackend::with_submit_response(GRADED));
    let (mut session, mut events) = session(&backend);

    session.select_choice("q2", "A");
    let outcome = session.submit_with(|_| false);
    assert_eq!(outcome, Ok(SubmitOutcome::Cancelled));
    settle(&mut session, &mut events).await;

    assert!(backend.submits().is_empty());
    assert!(!session.is_submitting());
}

#[tokio::test(start_paused = true)]
async fn test_typing_saves_once_after_pause() {
    let backend = Arc::new(FakeBackend::default());
    let (mut session, mut events) = session(&backend);

    for text in ["m", "my", "my th", "my thoughts"] {
        session.update_open_answer("q3", text);
        tokio::time::sleep(Duration::from_millis(900)).await;
        settle(&mut session, &mut events).await;
        assert!(backend.saves().is_empty());
    }

    tokio::time::sleep(Duration::from_millis(200)).await;
    settle(&mut session, &mut events).await;

    let saves = backend.saves();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].question_id, "q3");
    assert_eq!(saves[0].answer, "my thoughts");
    assert!(!session.has_pending_save());
    assert_eq!(session.progress().answered, 1);
}

#[tokio::test(start_paused = true)]
async fn test_pending_text_is_saved_before_submit() {
    let backend = Arc::new(FakeBackend::with_submit_response(GRADED));
    let (mut session, mut events) = session(&backend);

    session.select_choice("q1", "B");
    settle(&mut session, &mut events).await;
    session.update_open_answer("q3", "late edit");
    assert!(session.has_pending_save());

    session.submit_with(|_| true).unwrap();
    assert!(!session.has_pending_save());
    settle(&mut session, &mut events).await;

    let saves = backend.saves();
    assert_eq!(saves.len(), 2);
    assert_eq!(saves[1].question_id, "q3");
    assert_eq!(saves[1].answer, "late edit");
    assert_eq!(backend.submits().len(), 1);

    // The flushed save does not fire a second time from its timer.
    tokio::time::sleep(Duration::from_secs(2)).await;
    settle(&mut session, &mut events).await;
    assert_eq!(backend.saves().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_submit_failure_raises_alert() {
    let backend = Arc::new(FakeBackend::default());
    let (mut session, mut events) = session(&backend);

    session.select_choice("q1", "A");
    session.submit_with(|_| true).unwrap();
    settle(&mut session, &mut events).await;

    assert_eq!(backend.submits().len(), 1);
    assert_eq!(session.take_alert().as_deref(), Some(SUBMIT_FAILED_ALERT));
    assert_eq!(session.take_alert(), None);
    assert!(!session.is_submitting());
    assert!(session.results().is_none());
    assert_eq!(session.layout(), PageLayout::default());

    // The failed attempt leaves nothing in flight, so the user can retry.
    assert_eq!(session.submit_with(|_| true), Ok(SubmitOutcome::Sent));
    settle(&mut session, &mut events).await;
    assert_eq!(backend.submits().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_submitting_until_response_arrives() {
    let backend = Arc::new(FakeBackend {
        submit_delay: Duration::from_secs(1),
        ..FakeBackend::with_submit_response(GRADED)
    });
    let (mut session, mut events) = session(&backend);

    session.switch_mode(Mode::All, quizdesk::navigation::ModeButton::All);
    session.select_choice("q1", "B");
    session.submit_with(|_| true).unwrap();
    settle(&mut session, &mut events).await;
    assert!(session.is_submitting());
    assert!(session.results().is_none());

    tokio::time::sleep(Duration::from_secs(1)).await;
    settle(&mut session, &mut events).await;
    assert!(!session.is_submitting());
    assert!(matches!(
        session.results().map(|v| v.summary),
        Some(ScoreSummary::Scored { correct: 1, total: 1, .. })
    ));
    // All mode never showed the grid, so the layout leaves it as it was.
    assert_eq!(session.layout(), PageLayout::after_submit(Mode::All));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_selections_are_ignored() {
    let backend = Arc::new(FakeBackend::default());
    let (mut session, mut events) = session(&backend);

    session.select_choice("q1", "E");
    session.select_choice("q3", "A");
    session.select_choice("q9", "A");
    session.update_open_answer("q1", "text for a choice question");
    tokio::time::sleep(Duration::from_secs(2)).await;
    settle(&mut session, &mut events).await;

    assert!(backend.saves().is_empty());
    assert_eq!(session.answers().choice_count(), 0);
    assert_eq!(session.progress().answered, 0);
}

#[tokio::test(start_paused = true)]
async fn test_progress_follows_confirmed_saves() {
    let backend = Arc::new(FakeBackend::default());
    let (mut session, mut events) = session(&backend);

    session.select_choice("q2", "A");
    assert_eq!(session.progress().answered, 0);
    settle(&mut session, &mut events).await;
    assert_eq!(session.progress().answered, 1);
    assert!(session.is_marked(2));
}

#[tokio::test(start_paused = true)]
async fn test_restore_saved_answers() {
    let backend = Arc::new(FakeBackend::default());
    let (mut session, _events) = session(&backend);

    let saved: HashMap<String, String> = [
        ("q1", "B"),
        ("q2", "Z"),
        ("q3", "draft answer"),
        ("q9", "A"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    assert_eq!(session.restore_saved(&saved), 2);
    assert_eq!(session.answers().selected_choice("q1"), Some("B"));
    assert_eq!(session.answers().selected_choice("q2"), None);
    assert_eq!(session.answers().text("q3"), "draft answer");
    assert_eq!(session.progress().answered, 2);
    // Restoring does not echo anything back to the server.
    assert!(backend.saves().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_save_notice_expires() {
    let backend = Arc::new(FakeBackend::default());
    let (mut session, _events) = session(&backend);

    let now = Instant::now();
    session.handle_event(
        SyncEvent::Saved {
            question_id: "q1".into(),
            receipt: SaveReceipt {
                status: Some("success".into()),
                saved_at: Some("2024-05-01T12:34:56.789012".into()),
            },
        },
        now,
    );
    session.handle_event(
        SyncEvent::Saved {
            question_id: "q2".into(),
            receipt: SaveReceipt::default(),
        },
        now,
    );

    assert_eq!(
        session.notice("q1").map(|n| n.text.as_str()),
        Some("Saved at 12:34:56")
    );
    // A save without a timestamp still gets a notice.
    assert_eq!(session.notice("q2").map(|n| n.text.as_str()), Some("Saved"));
    assert!(session.latest_notice().is_some());

    session.prune_notices(now + Duration::from_secs(1));
    assert!(session.notice("q1").is_some());
    session.prune_notices(now + Duration::from_secs(3));
    assert!(session.notice("q1").is_none());
    assert!(session.latest_notice().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_progress_follows_answers_when_saves_fail() {
    let backend = Arc::new(FakeBackend {
        fail_saves: true,
        ..FakeBackend::default()
    });
    let (mut session, mut events) = session(&backend);

    let saved: HashMap<String, String> = [("q3".to_string(), "draft".to_string())].into();
    session.restore_saved(&saved);
    assert!(session.is_marked(3));

    session.select_choice("q1", "A");
    session.update_open_answer("q3", "");
    tokio::time::sleep(Duration::from_millis(1500)).await;
    settle(&mut session, &mut events).await;

    assert_eq!(backend.saves().len(), 2);
    assert!(session.notice("q1").is_none());
    assert_eq!(session.progress().answered, 1);
    assert!(session.is_marked(1));
    assert!(!session.is_marked(3));
    assert!(!session.answers().is_answered("q3"));
}

#[tokio::test(start_paused = true)]
async fn test_flush_sends_waiting_save_now() {
    let backend = Arc::new(FakeBackend::default());
    let (mut session, mut events) = session(&backend);

    assert!(!session.flush_pending_save().await);

    session.update_open_answer("q3", "last words");
    assert!(session.flush_pending_save().await);
    assert!(!session.has_pending_save());
    let saves = backend.saves();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].answer, "last words");

    tokio::time::sleep(Duration::from_secs(2)).await;
    settle(&mut session, &mut events).await;
    assert_eq!(backend.saves().len(), 1);
    assert_eq!(session.progress().answered, 1);
}
