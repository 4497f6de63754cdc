use crate::answers::AnswerStore;
use crate::model::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    /// Fill level of the progress bar, 0–100.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answered as f64 / self.total as f64 * 100.0
    }
}

/// Answered count plus the per-question markers shown in the navigation grid.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    progress: Progress,
    answered: Vec<bool>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Marker for the card at 1-based `index`.
    pub fn is_marked(&self, index: usize) -> bool {
        index
            .checked_sub(1)
            .and_then(|i| self.answered.get(i))
            .copied()
            .unwrap_or(false)
    }

    pub fn recompute(&mut self, questions: &[Question], answers: &AnswerStore) {
        self.answered = questions.iter().map(|q| answers.is_answered(&q.id)).collect();
        self.progress = Progress {
            answered: self.answered.iter().filter(|a| **a).count(),
            total: questions.len(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::Answer;
    use crate::model::{Choice, QuestionKind};

    fn question(n: u32, kind: QuestionKind) -> Question {
        Question {
            id: format!("q{}", n),
            number: n,
            text: format!("Question {}", n),
            kind,
        }
    }

    fn quiz() -> Vec<Question> {
        let choices = vec![
            Choice { label: 'A', text: "one".into() },
            Choice { label: 'B', text: "two".into() },
        ];
        vec![
            question(1, QuestionKind::Choice(choices.clone())),
            question(2, QuestionKind::Choice(choices)),
            question(3, QuestionKind::Open),
            question(4, QuestionKind::Open),
        ]
    }

    #[test]
    fn percent_follows_answered_count() {
        let questions = quiz();
        let mut answers = AnswerStore::new();
        let mut tracker = ProgressTracker::new();

        tracker.recompute(&questions, &answers);
        assert_eq!(tracker.progress(), Progress { answered: 0, total: 4 });
        assert_eq!(tracker.progress().percent(), 0.0);

        answers.record("q1", Answer::Choice("A".into()));
        tracker.recompute(&questions, &answers);
        assert_eq!(tracker.progress().percent(), 25.0);

        answers.record("q3", Answer::Text("graphs".into()));
        answers.record("q4", Answer::Text("state".into()));
        answers.record("q2", Answer::Choice("B".into()));
        tracker.recompute(&questions, &answers);
        assert_eq!(tracker.progress().percent(), 100.0);
    }

    #[test]
    fn clearing_text_removes_marker() {
        let questions = quiz();
        let mut answers = AnswerStore::new();
        let mut tracker = ProgressTracker::new();

        answers.record("q3", Answer::Text("draft".into()));
        tracker.recompute(&questions, &answers);
        assert!(tracker.is_marked(3));
        assert_eq!(tracker.progress().answered, 1);

        answers.record("q3", Answer::Text("  ".into()));
        tracker.recompute(&questions, &answers);
        assert!(!tracker.is_marked(3));
        assert_eq!(tracker.progress().answered, 0);
    }

    #[test]
    fn recompute_is_idempotent() {
        let questions = quiz();
        let mut answers = AnswerStore::new();
        answers.record("q2", Answer::Choice("A".into()));
        let mut tracker = ProgressTracker::new();

        tracker.recompute(&questions, &answers);
        let first = (tracker.progress(), (1..=4).map(|i| tracker.is_marked(i)).collect::<Vec<_>>());
        tracker.recompute(&questions, &answers);
        let second = (tracker.progress(), (1..=4).map(|i| tracker.is_marked(i)).collect::<Vec<_>>());
        assert_eq!(first, second);
    }

    #[test]
    fn empty_quiz_has_zero_percent() {
        let tracker = ProgressTracker::new();
        assert_eq!(tracker.progress().percent(), 0.0);
        assert!(!tracker.is_marked(1));
    }
}
