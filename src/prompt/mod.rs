use std::io::{BufRead, Write};
#[cfg(test)]
use std::sync::Mutex;
use std::sync::Arc;
use tracing::warn;

/// A yes/no question asked before a potentially large or unwanted download.
///
/// Implementations may block on the terminal; async code asks through [`ask`].
pub trait Confirm: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
}

/// Asks on the blocking thread pool so a stdin read never stalls the runtime.
/// A panicked or cancelled prompt counts as "no".
pub async fn ask(confirm: &Arc<dyn Confirm>, question: impl Into<String>) -> bool {
    let confirm = Arc::clone(confirm);
    let question = question.into();
    match tokio::task::spawn_blocking(move || confirm.confirm(&question)).await {
        Ok(answer) => answer,
        Err(e) => {
            warn!("Prompt did not complete, treating as no: {}", e);
            false
        }
    }
}

/// Asks on stdout and reads the answer from stdin.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        print!("{question} (y/n): ");
        if let Err(e) = std::io::stdout().flush() {
            warn!("Failed to flush prompt: {}", e);
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                warn!("Failed to read answer, treating as no: {}", e);
                false
            }
        }
    }
}

/// Agrees to everything; used for `--yes`.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, question: &str) -> bool {
        println!("{question} (y/n): y");
        true
    }
}

/// Replays fixed answers in order and records the questions asked.
/// Answers `false` once the script runs out.
#[cfg(test)]
#[derive(Default)]
pub struct ScriptedConfirm {
    answers: Mutex<Vec<bool>>,
    asked: Mutex<Vec<String>>,
}

#[cfg(test)]
impl ScriptedConfirm {
    pub fn new(answers: &[bool]) -> Self {
        let mut answers = answers.to_vec();
        answers.reverse();
        Self {
            answers: Mutex::new(answers),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl Confirm for ScriptedConfirm {
    fn confirm(&self, question: &str) -> bool {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(question.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut a| a.pop())
            .unwrap_or(false)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(is_yes("Y"));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
        assert!(!is_yes("yeah"));
    }

    #[test]
    fn test_scripted_confirm_replays_in_order() {
        let confirm = ScriptedConfirm::new(&[true, false]);
        assert!(confirm.confirm("first?"));
        assert!(!confirm.confirm("second?"));
        assert!(!confirm.confirm("third?"));
        assert_eq!(confirm.asked(), ["first?", "second?", "third?"]);
    }

    #[tokio::test]
    async fn test_ask_runs_off_the_runtime() {
        let scripted = Arc::new(ScriptedConfirm::new(&[true, false]));
        let confirm: Arc<dyn Confirm> = scripted.clone();

        assert!(ask(&confirm, "first?").await);
        assert!(!ask(&confirm, String::from("second?")).await);
        assert_eq!(scripted.asked(), ["first?", "second?"]);
    }

    #[test]
    fn test_assume_yes() {
        assert!(AssumeYes.confirm("anything?"));
    }
}
