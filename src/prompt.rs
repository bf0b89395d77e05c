//! Interactive yes/no confirmation.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Source of answers to yes/no questions.
pub trait Prompt {
    /// Ask `question`; `true` only on an explicit yes.
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Prompt that reads answers line by line from a reader.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process terminal.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt for ConsolePrompt<R, W> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{question} [y/N]: ")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            // EOF counts as "no"
            writeln!(self.output)?;
            return Ok(false);
        }
        Ok(is_yes(&answer))
    }
}

/// Prompt with a fixed list of answers; answers "no" once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(input: &str) -> (bool, String) {
        let mut output = Vec::new();
        let answer = ConsolePrompt::new(input.as_bytes(), &mut output)
            .confirm("Continue?")
            .unwrap();
        (answer, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_console_prompt_accepts_yes() {
        assert!(ask("y\n").0);
        assert!(ask("YES\n").0);
        assert!(ask("  Yes  \n").0);
    }

    #[test]
    fn test_console_prompt_rejects_everything_else() {
        assert!(!ask("n\n").0);
        assert!(!ask("\n").0);
        assert!(!ask("yep\n").0);
    }

    #[test]
    fn test_console_prompt_eof_is_no() {
        let (answer, output) = ask("");
        assert!(!answer);
        assert_eq!(output, "Continue? [y/N]: \n");
    }

    #[test]
    fn test_console_prompt_writes_question() {
        let (_, output) = ask("y\n");
        assert_eq!(output, "Continue? [y/N]: ");
    }

    #[test]
    fn test_scripted_prompt() {
        let mut prompt = ScriptedPrompt::new([true]);
        assert!(prompt.confirm("first").unwrap());
        assert!(!prompt.confirm("second").unwrap());
        assert_eq!(prompt.asked(), ["first", "second"]);
    }
}
