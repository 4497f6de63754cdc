#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;

use quizdesk::api::{
    Catalog, QuizBackend, SaveReceipt, SaveRequest, SubmitRequest, SubmitResponse,
};
use quizdesk::error::BackendError;
use quizdesk::model::{Choice, Question, QuestionKind, Quiz};
use quizdesk::session::QuizSession;
use quizdesk::sync::{AnswerSync, SyncEvent};

/// Backend that records every call and answers from canned data.
#[derive(Default)]
pub struct FakeBackend {
    pub saves: Mutex<Vec<SaveRequest>>,
    pub submits: Mutex<Vec<SubmitRequest>>,
    pub submit_response: Mutex<Option<SubmitResponse>>,
    pub saved: HashMap<String, String>,
    pub saved_at: Option<String>,
    /// Reject every save with a 400, as the server does for an empty answer.
    pub fail_saves: bool,
    pub submit_delay: Duration,
}

impl FakeBackend {
    pub fn with_submit_response(json: &str) -> Self {
        Self {
            submit_response: Mutex::new(Some(serde_json::from_str(json).unwrap())),
            ..Self::default()
        }
    }

    pub fn saves(&self) -> Vec<SaveRequest> {
        self.saves.lock().unwrap().clone()
    }

    pub fn submits(&self) -> Vec<SubmitRequest> {
        self.submits.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuizBackend for FakeBackend {
    async fn save_answer(&self, request: &SaveRequest) -> Result<SaveReceipt, BackendError> {
        self.saves.lock().unwrap().push(request.clone());
        if self.fail_saves {
            return Err(BackendError::HttpStatus(reqwest::StatusCode::BAD_REQUEST));
        }
        Ok(SaveReceipt {
            status: Some("success".into()),
            saved_at: self.saved_at.clone(),
        })
    }

    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse, BackendError> {
        self.submits.lock().unwrap().push(request.clone());
        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }
        match self.submit_response.lock().unwrap().clone() {
            Some(response) => Ok(response),
            None => Err(BackendError::HttpStatus(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            )),
        }
    }

    async fn saved_answers(
        &self,
        _quiz_file: &str,
    ) -> Result<HashMap<String, String>, BackendError> {
        Ok(self.saved.clone())
    }

    async fn catalog(&self) -> Result<Catalog, BackendError> {
        Ok(Catalog::default())
    }
}

fn choice(label: char, text: &str) -> Choice {
    Choice {
        label,
        text: text.to_string(),
    }
}

/// Two choice questions followed by one open question.
pub fn three_question_quiz() -> Quiz {
    Quiz {
        title: "Graph basics".into(),
        quiz_file: "quizzes/01_quiz_set1_graph_basics.md".into(),
        questions: vec![
            Question {
                id: "q1".into(),
                number: 1,
                text: "Which class builds a state graph?".into(),
                kind: QuestionKind::Choice(vec![
                    choice('A', "ChainGraph"),
                    choice('B', "StateGraph"),
                    choice('C', "FlowGraph"),
                ]),
            },
            Question {
                id: "q2".into(),
                number: 2,
                text: "Which call compiles a graph?".into(),
                kind: QuestionKind::Choice(vec![
                    choice('A', "compile()"),
                    choice('B', "build()"),
                ]),
            },
            Question {
                id: "q3".into(),
                number: 3,
                text: "Explain a conditional edge.".into(),
                kind: QuestionKind::Open,
            },
        ],
    }
}

pub fn session(backend: &Arc<FakeBackend>) -> (QuizSession, UnboundedReceiver<SyncEvent>) {
    let quiz = three_question_quiz();
    let (sync, events) = AnswerSync::new(backend.clone(), &quiz.quiz_file, Handle::current());
    (QuizSession::new(quiz, sync), events)
}

/// Let spawned tasks run, then feed every finished call back to the session.
pub async fn settle(session: &mut QuizSession, events: &mut UnboundedReceiver<SyncEvent>) {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    while let Ok(event) = events.try_recv() {
        session.handle_event(event, Instant::now());
    }
}
