use crate::api::{QuestionResult, ResultKind, SubmitResponse};
use crate::navigation::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Correct,
    Incorrect,
    /// Free-text answer; never scored.
    Open,
}

impl ResultStatus {
    pub fn symbol(self) -> &'static str {
        match self {
            ResultStatus::Correct => "✓",
            ResultStatus::Incorrect => "✗",
            ResultStatus::Open => "📝",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultEntry {
    pub number: u32,
    pub text: String,
    pub status: ResultStatus,
    pub user_answer: Option<String>,
    /// Only set for choice questions.
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
}

impl ResultEntry {
    fn from_result(result: &QuestionResult) -> Self {
        let status = match result.kind {
            ResultKind::Choice if result.is_correct.unwrap_or(false) => ResultStatus::Correct,
            ResultKind::Choice => ResultStatus::Incorrect,
            ResultKind::Open => ResultStatus::Open,
        };
        let correct_answer = match result.kind {
            ResultKind::Choice => result.correct_answer.clone(),
            ResultKind::Open => None,
        };
        Self {
            number: result.number,
            text: result.text.clone(),
            status,
            user_answer: result.user_answer.clone().filter(|a| !a.is_empty()),
            correct_answer,
            explanation: result
                .explanation
                .as_ref()
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
        }
    }

    pub fn user_answer_display(&self) -> &str {
        self.user_answer.as_deref().unwrap_or("Not answered")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSummary {
    Scored {
        correct: usize,
        total: usize,
        percent: u32,
        unscored_open: usize,
    },
    OpenOnly {
        open_count: usize,
    },
}

impl ScoreSummary {
    pub fn headline(&self) -> String {
        match self {
            ScoreSummary::Scored {
                correct,
                total,
                percent,
                ..
            } => format!("Choice score: {}/{} ({}%)", correct, total, percent),
            ScoreSummary::OpenOnly { .. } => "Submitted!".to_string(),
        }
    }

    pub fn detail(&self) -> Option<String> {
        match *self {
            ScoreSummary::Scored { unscored_open: 0, .. } => None,
            ScoreSummary::Scored { unscored_open, .. } => Some(format!(
                "{} open {} unscored",
                unscored_open,
                plural(unscored_open)
            )),
            ScoreSummary::OpenOnly { open_count } => Some(format!(
                "This quiz has {} open {}; review the answers and explanations below.",
                open_count,
                plural(open_count)
            )),
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        "question"
    } else {
        "questions"
    }
}

/// Scored result set for one successful submit.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub summary: ScoreSummary,
    pub entries: Vec<ResultEntry>,
}

impl ResultsView {
    pub fn from_response(response: &SubmitResponse) -> Self {
        let choice: Vec<&QuestionResult> = response
            .results
            .iter()
            .filter(|r| r.kind == ResultKind::Choice)
            .collect();
        let open_count = response.results.len() - choice.len();

        let summary = if choice.is_empty() {
            ScoreSummary::OpenOnly {
                open_count: response.results.len(),
            }
        } else {
            let correct = choice
                .iter()
                .filter(|r| r.is_correct.unwrap_or(false))
                .count();
            let total = choice.len();
            ScoreSummary::Scored {
                correct,
                total,
                percent: (correct as f64 / total as f64 * 100.0).round() as u32,
                unscored_open: open_count,
            }
        };

        Self {
            summary,
            entries: response.results.iter().map(ResultEntry::from_result).collect(),
        }
    }
}

/// Which parts of the quiz page are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub nav_grid_visible: bool,
    pub questions_visible: bool,
    pub results_visible: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            nav_grid_visible: true,
            questions_visible: true,
            results_visible: false,
        }
    }
}

impl PageLayout {
    /// Results take the place of question entry. Single mode also hides the
    /// grid; all mode leaves it alone since that mode does not show it.
    pub fn after_submit(mode: Mode) -> Self {
        match mode {
            Mode::Single => Self {
                nav_grid_visible: false,
                questions_visible: false,
                results_visible: true,
            },
            Mode::All => Self {
                nav_grid_visible: true,
                questions_visible: false,
                results_visible: true,
            },
        }
    }
}
