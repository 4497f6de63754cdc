use std::collections::{BTreeMap, HashMap};

use crate::model::{Question, QuestionKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Label of the selected option.
    Choice(String),
    Text(String),
}

impl Answer {
    pub fn is_answered(&self) -> bool {
        match self {
            Answer::Choice(label) => !label.is_empty(),
            Answer::Text(text) => !text.trim().is_empty(),
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Answer::Choice(v) | Answer::Text(v) => v,
        }
    }
}

/// Per-question answers, keyed by question id.
#[derive(Debug, Clone, Default)]
pub struct AnswerStore {
    answers: HashMap<String, Answer>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, question_id: &str, answer: Answer) {
        self.answers.insert(question_id.to_string(), answer);
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn text(&self, question_id: &str) -> &str {
        match self.answers.get(question_id) {
            Some(Answer::Text(t)) => t,
            _ => "",
        }
    }

    pub fn selected_choice(&self, question_id: &str) -> Option<&str> {
        match self.answers.get(question_id) {
            Some(Answer::Choice(label)) => Some(label),
            _ => None,
        }
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answers
            .get(question_id)
            .map(Answer::is_answered)
            .unwrap_or(false)
    }

    /// Number of questions with a selected option.
    pub fn choice_count(&self) -> usize {
        self.answers
            .values()
            .filter(|a| matches!(a, Answer::Choice(_)) && a.is_answered())
            .count()
    }

    /// Selected options keyed by question id; free-text answers are left out.
    pub fn choice_snapshot(&self) -> BTreeMap<String, String> {
        self.answers
            .iter()
            .filter_map(|(id, answer)| match answer {
                Answer::Choice(label) if !label.is_empty() => Some((id.clone(), label.clone())),
                _ => None,
            })
            .collect()
    }

    /// Load answers previously saved on the server. Values that do not fit the
    /// question (unknown id, label not offered) are dropped.
    pub fn restore(&mut self, questions: &[Question], saved: &HashMap<String, String>) -> usize {
        let mut restored = 0;
        for q in questions {
            let Some(value) = saved.get(&q.id) else {
                continue;
            };
            let answer = match &q.kind {
                QuestionKind::Choice(_) if q.has_option(value) => Answer::Choice(value.clone()),
                QuestionKind::Choice(_) => continue,
                QuestionKind::Open => Answer::Text(value.clone()),
            };
            self.answers.insert(q.id.clone(), answer);
            restored += 1;
        }
        restored
    }
}
