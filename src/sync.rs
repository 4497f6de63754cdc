use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::{QuizBackend, SaveReceipt, SaveRequest, SubmitRequest, SubmitResponse};
use crate::debounce::Debouncer;
use crate::error::BackendError;

/// Quiet period before a free-text edit is saved.
pub const SAVE_DEBOUNCE: Duration = Duration::from_secs(1);

/// Outcome of a network call, delivered back to the event loop.
#[derive(Debug)]
pub enum SyncEvent {
    Saved {
        question_id: String,
        receipt: SaveReceipt,
    },
    SaveFailed {
        question_id: String,
        error: BackendError,
    },
    Submitted(SubmitResponse),
    SubmitFailed(BackendError),
}

/// Sends answers to the scoring server. Calls run on the runtime and report
/// through the event channel; nothing here touches session state.
pub struct AnswerSync {
    backend: Arc<dyn QuizBackend>,
    quiz_file: String,
    runtime: Handle,
    events: UnboundedSender<SyncEvent>,
    open_saves: Debouncer<SaveRequest>,
}

impl AnswerSync {
    pub fn new(
        backend: Arc<dyn QuizBackend>,
        quiz_file: &str,
        runtime: Handle,
    ) -> (Self, UnboundedReceiver<SyncEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let open_saves = Debouncer::new(SAVE_DEBOUNCE, runtime.clone());
        let sync = Self {
            backend,
            quiz_file: quiz_file.to_string(),
            runtime,
            events,
            open_saves,
        };
        (sync, rx)
    }

    pub fn quiz_file(&self) -> &str {
        &self.quiz_file
    }

    /// Save right away. Fire-and-forget: the outcome only arrives as an event.
    pub fn save_now(&self, question_id: &str, answer: &str) {
        let request = self.request(question_id, answer);
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        self.runtime.spawn(async move {
            save(backend.as_ref(), request, &events).await;
        });
    }

    /// Save after `SAVE_DEBOUNCE` of inactivity. One slot is shared by every
    /// question, so an edit to another question replaces the waiting save.
    pub fn save_debounced(&mut self, question_id: &str, answer: &str) {
        let request = self.request(question_id, answer);
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tracing::debug!(question_id, "open answer save scheduled");
        self.open_saves.schedule(request, move |request| async move {
            save(backend.as_ref(), request, &events).await;
        });
    }

    /// Send the save waiting in the debounce slot right away and wait for it.
    /// Returns false when nothing was waiting.
    pub async fn flush(&mut self) -> bool {
        let Some(request) = self.open_saves.take_pending() else {
            return false;
        };
        tracing::debug!(question_id = %request.question_id, "flushing open answer save");
        save(self.backend.as_ref(), request, &self.events).await;
        true
    }

    pub fn has_pending_save(&self) -> bool {
        self.open_saves.is_pending()
    }

    /// Submit the selected options. A save still waiting in the debounce slot
    /// is sent first so the server has it before scoring.
    pub fn submit(&mut self, answers: BTreeMap<String, String>) {
        let flushed = self.open_saves.take_pending();
        let request = SubmitRequest {
            quiz_file: self.quiz_file.clone(),
            answers,
        };
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();

        tracing::info!(
            quiz_file = %request.quiz_file,
            answers = request.answers.len(),
            flushed = flushed.is_some(),
            "submitting quiz"
        );

        self.runtime.spawn(async move {
            if let Some(pending) = flushed {
                save(backend.as_ref(), pending, &events).await;
            }
            let event = match backend.submit(&request).await {
                Ok(response) => SyncEvent::Submitted(response),
                Err(error) => SyncEvent::SubmitFailed(error),
            };
            let _ = events.send(event);
        });
    }

    fn request(&self, question_id: &str, answer: &str) -> SaveRequest {
        SaveRequest {
            quiz_file: self.quiz_file.clone(),
            question_id: question_id.to_string(),
            answer: answer.to_string(),
        }
    }
}

async fn save(backend: &dyn QuizBackend, request: SaveRequest, events: &UnboundedSender<SyncEvent>) {
    let event = match backend.save_answer(&request).await {
        Ok(receipt) => SyncEvent::Saved {
            question_id: request.question_id,
            receipt,
        },
        Err(error) => SyncEvent::SaveFailed {
            question_id: request.question_id,
            error,
        },
    };
    // Fails only when the quiz was closed; there is nothing left to update.
    let _ = events.send(event);
}
