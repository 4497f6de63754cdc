use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "quizdesk", version, about = "Take quizzes in the terminal against a scoring server")]
pub struct Cli {
    /// Quiz file relative to the project root; opens the quiz list when omitted
    pub quiz_file: Option<String>,

    /// Base URL of the scoring server
    #[arg(long, env = "QUIZDESK_SERVER", default_value = "http://localhost:5000")]
    pub server: String,

    /// Project root the quiz files live under
    #[arg(long, value_name = "dir", default_value = ".")]
    pub root: PathBuf,

    /// Start with every question on screen
    #[arg(long)]
    pub all: bool,

    /// Print the quiz list and exit
    #[arg(long)]
    pub list: bool,

    /// Log file [default: platform data dir]
    #[arg(long, value_name = "path")]
    pub log_file: Option<PathBuf>,

    /// Preferences file [default: platform config dir]
    #[arg(long, value_name = "path")]
    pub prefs: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["quizdesk"]).unwrap();
        assert_eq!(cli.quiz_file, None);
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(!cli.all);
        assert!(!cli.list);
    }

    #[test]
    fn quiz_and_flags() {
        let cli = Cli::try_parse_from([
            "quizdesk",
            "phase1/05_quiz_set1_graph_basics.md",
            "--server",
            "http://quiz.local:8080",
            "--all",
        ])
        .unwrap();
        assert_eq!(cli.quiz_file.as_deref(), Some("phase1/05_quiz_set1_graph_basics.md"));
        assert_eq!(cli.server, "http://quiz.local:8080");
        assert!(cli.all);
    }
}
