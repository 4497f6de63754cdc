use std::fs;
use std::path::Path;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::error::QuizLoadError;
use crate::model::*;

const TYPE_TAG: &str = "[类型:";
const QUESTION_PREFIXES: [&str; 3] = ["题目", "问题", "question"];
const SUMMARY_MARKERS: [&str; 4] = ["正确答案汇总", "测试总结", "自我评估", "完成时间"];
/// Lines containing any of these never become the question text. Bold
/// markers are kept in block lines so these match the raw markdown.
const ANSWER_MARKERS: [&str; 6] = [
    "**正确答案",
    "**你的答案",
    "正确答案",
    "你的答案",
    "**解析",
    "解析：",
];
const BOLD: &str = "**";

/// Read `quiz_file` (relative to `root`) and parse it.
pub fn load_quiz(root: &Path, quiz_file: &str) -> Result<Quiz, QuizLoadError> {
    let path = root.join(quiz_file);
    let content =
        fs::read_to_string(&path).map_err(|source| QuizLoadError::Io { path, source })?;
    parse_quiz(&content, quiz_file)
}

pub fn parse_quiz(content: &str, quiz_file: &str) -> Result<Quiz, QuizLoadError> {
    let blocks = collect_blocks(content);

    let mut questions = Vec::new();
    for (idx, block) in blocks.into_iter().enumerate() {
        // Numbering follows block order even when a block is skipped, so ids
        // line up with the ones the scoring server assigns.
        let number = idx as u32 + 1;
        if let Some(question) = build_question(number, block) {
            questions.push(question);
        }
    }

    if questions.is_empty() {
        return Err(QuizLoadError::Empty(quiz_file.to_string()));
    }

    Ok(Quiz {
        // Same title the catalog lists for this file.
        title: title_from_file(quiz_file),
        quiz_file: quiz_file.to_string(),
        questions,
    })
}

#[derive(Debug, Default)]
struct Block {
    tag: Option<String>,
    lines: Vec<String>,
}

fn collect_blocks(content: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();

    let mut in_heading = false;
    let mut heading_text = String::new();
    let mut in_code_block = false;
    let mut line = String::new();

    for event in Parser::new_ext(content, Options::empty()) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                flush_line(&mut line, &mut blocks);
                in_heading = true;
                heading_text.clear();
            }
            Event::End(TagEnd::Heading(level)) => {
                in_heading = false;
                let text = heading_text.trim().to_string();
                match level {
                    HeadingLevel::H1 => {}
                    _ if is_summary_heading(&text) => break,
                    HeadingLevel::H3 => match parse_question_heading(&text) {
                        Some((tag, rest)) => {
                            let mut lines = Vec::new();
                            if !rest.is_empty() {
                                lines.push(rest);
                            }
                            blocks.push(Block { tag, lines });
                        }
                        None => {
                            if let Some(block) = blocks.last_mut() {
                                block.lines.push(text);
                            }
                        }
                    },
                    _ => {}
                }
            }
            Event::Start(Tag::CodeBlock(_)) => {
                flush_line(&mut line, &mut blocks);
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
            }
            Event::Start(Tag::Strong) | Event::End(TagEnd::Strong) => {
                if !in_heading && !in_code_block {
                    line.push_str(BOLD);
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if in_heading {
                    heading_text.push_str(&text);
                } else if !in_code_block {
                    line.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if in_heading {
                    heading_text.push(' ');
                } else {
                    flush_line(&mut line, &mut blocks);
                }
            }
            Event::End(TagEnd::Paragraph) | Event::End(TagEnd::Item) => {
                flush_line(&mut line, &mut blocks);
            }
            _ => {}
        }
    }
    flush_line(&mut line, &mut blocks);

    blocks
}

fn flush_line(line: &mut String, blocks: &mut [Block]) {
    let text = line.trim().to_string();
    line.clear();
    if text.is_empty() {
        return;
    }
    if let Some(block) = blocks.last_mut() {
        block.lines.push(text);
    }
}

fn build_question(number: u32, block: Block) -> Option<Question> {
    let mut tag = block.tag;
    let mut lines: &[String] = &block.lines;

    if tag.is_none() {
        if let Some(first) = lines.first() {
            if let (Some(t), rest) = split_type_tag(first) {
                tag = Some(t);
                if rest.is_empty() {
                    lines = &lines[1..];
                }
            }
        }
    }

    let text = lines
        .iter()
        .find(|l| is_question_text(l))
        .map(|l| l.replace(BOLD, "").trim().to_string())?;

    let mut choices: Vec<Choice> = Vec::new();
    for line in lines {
        if let Some(choice) = parse_option(line) {
            if !choices.iter().any(|c| c.label == choice.label) {
                choices.push(choice);
            }
        }
    }

    let is_choice = match tag.as_deref() {
        Some("choice") => true,
        Some(_) => false,
        None => !choices.is_empty(),
    };

    let kind = if is_choice {
        QuestionKind::Choice(choices)
    } else {
        QuestionKind::Open
    };

    Some(Question {
        id: format!("q{}", number),
        number,
        text,
        kind,
    })
}

fn split_type_tag(text: &str) -> (Option<String>, &str) {
    let trimmed = text.trim_start();
    if let Some(rest) = trimmed.strip_prefix(TYPE_TAG) {
        if let Some(end) = rest.find(']') {
            let tag = rest[..end].trim().to_lowercase();
            return (Some(tag), rest[end + 1..].trim());
        }
    }
    (None, trimmed)
}

/// Type tag and any question text that follows the number, when the heading
/// opens a question block.
fn parse_question_heading(text: &str) -> Option<(Option<String>, String)> {
    let (tag, rest) = split_type_tag(text);
    let after = QUESTION_PREFIXES.iter().find_map(|prefix| {
        let head = rest.get(..prefix.len())?;
        head.eq_ignore_ascii_case(prefix).then(|| &rest[prefix.len()..])
    })?;
    let after = after.trim_start();
    if !after.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let remainder = after
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches([':', '：'])
        .trim();
    Some((tag, remainder.to_string()))
}

fn is_summary_heading(text: &str) -> bool {
    SUMMARY_MARKERS.iter().any(|m| text.starts_with(m))
}

fn has_answer_marker(line: &str) -> bool {
    ANSWER_MARKERS.iter().any(|m| line.contains(m))
}

fn is_question_text(line: &str) -> bool {
    !line.starts_with('[') && !has_answer_marker(line)
}

fn parse_option(line: &str) -> Option<Choice> {
    let mut chars = line.chars();
    let label = chars.next().filter(|c| ('A'..='D').contains(c))?;
    if chars.next() != Some('.') {
        return None;
    }
    let text = chars.as_str().trim();
    // Blank answer slots such as `A. ___` or `A. **你的答案**：___`.
    if text.is_empty() || text.starts_with("___") || text.starts_with("**你的答案") {
        return None;
    }
    Some(Choice {
        label,
        text: text.replace(BOLD, "").trim().to_string(),
    })
}

/// `05_quiz_set1_graph_basics` becomes `graph basics（set1）`.
fn title_from_file(quiz_file: &str) -> String {
    let stem = Path::new(quiz_file)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| quiz_file.to_string());

    let digits_end = stem
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(stem.len());
    if digits_end > 0 {
        if let Some(rest) = stem[digits_end..].strip_prefix("_quiz_") {
            if let Some((set, topic)) = rest.split_once('_') {
                let is_set = set.len() > 3
                    && set.starts_with("set")
                    && set[3..].chars().all(|c| c.is_ascii_digit());
                if is_set {
                    return format!("{}（{}）", topic.replace('_', " "), set);
                }
            }
        }
    }

    stem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_from_quiz_set_filename() {
        assert_eq!(
            title_from_file("examples/phase01_basics/quizzes/05_quiz_set1_graph_basics.md"),
            "graph basics（set1）"
        );
        assert_eq!(title_from_file("quizzes/review.md"), "review");
    }

    #[test]
    fn option_lines() {
        let c = parse_option("B. StateGraph").unwrap();
        assert_eq!(c.label, 'B');
        assert_eq!(c.text, "StateGraph");
        assert!(parse_option("E. out of range").is_none());
        assert!(parse_option("A. ___").is_none());
        assert!(parse_option("A.").is_none());
        assert!(parse_option("B. **你的答案**：___").is_none());
        assert_eq!(parse_option("C. **bold** option").unwrap().text, "bold option");
    }

    #[test]
    fn question_heading_styles() {
        assert_eq!(
            parse_question_heading("[类型:choice] 题目1："),
            Some((Some("choice".to_string()), String::new()))
        );
        assert_eq!(parse_question_heading("问题 2："), Some((None, String::new())));
        assert_eq!(
            parse_question_heading("question 3: What is a node?"),
            Some((None, "What is a node?".to_string()))
        );
        assert_eq!(parse_question_heading("知识点回顾"), None);
        assert_eq!(parse_question_heading("Question time"), None);
    }

    #[test]
    fn skipped_block_keeps_numbering() {
        let content = "### 题目1：\n\n[类型:open]\n\n### 题目2：\n\n**Why graphs?**\n";
        let quiz = parse_quiz(content, "q.md").unwrap();
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].id, "q2");
        assert_eq!(quiz.questions[0].number, 2);
        assert_eq!(quiz.questions[0].text, "Why graphs?");
    }

    #[test]
    fn empty_quiz_is_an_error() {
        let err = parse_quiz("# Nothing here\n\nJust prose.\n", "empty.md").unwrap_err();
        assert!(matches!(err, QuizLoadError::Empty(_)));
    }
}
