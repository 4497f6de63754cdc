#[derive(Debug, Clone)]
pub struct Quiz {
    pub title: String,
    /// Identifier the backend knows this quiz by (path relative to the project root).
    pub quiz_file: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }
}

#[derive(Debug, Clone)]
pub struct Question {
    pub id: String,
    pub number: u32,
    pub text: String,
    pub kind: QuestionKind,
}

impl Question {
    pub fn is_choice(&self) -> bool {
        matches!(self.kind, QuestionKind::Choice(_))
    }

    pub fn has_option(&self, label: &str) -> bool {
        match &self.kind {
            QuestionKind::Choice(choices) => choices.iter().any(|c| c.label.to_string() == label),
            QuestionKind::Open => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    Choice(Vec<Choice>),
    Open,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub label: char,
    pub text: String,
}
