//! Yes/no decisions, either asked interactively or supplied by the caller.

use std::io::{self, BufRead, Write};

/// Supplies a yes/no answer to a question.
///
/// Any `FnMut(&str) -> bool` closure is a `Confirm`, which is how tests and
/// non-interactive callers decide without touching stdin.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self(question))
    }
}

/// Answers every question the same way without prompting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        log::info!("{} answered {} without prompting", question, if self.0 { "yes" } else { "no" });
        Ok(self.0)
    }
}

/// Asks on a text stream and keeps asking until it gets a recognizable answer.
///
/// An empty answer takes the default (yes). End of input counts as no.
pub struct StdinPrompt<R, W> {
    input: R,
    output: W,
}

impl StdinPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Maps an answer to a decision. `None` means the answer was not understood.
pub fn parse_answer(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "" | "y" | "ye" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

impl<R: BufRead, W: Write> Confirm for StdinPrompt<R, W> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            write!(self.output, "{} [Y/n] ", question)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(false);
            }

            match parse_answer(&line) {
                Some(answer) => return Ok(answer),
                None => writeln!(
                    self.output,
                    "Please respond with 'yes' or 'no' (or 'y' or 'n')."
                )?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(input: &str) -> (bool, String) {
        let mut prompt = StdinPrompt::new(input.as_bytes(), Vec::new());
        let answer = prompt.confirm("Save model?").unwrap();
        (answer, String::from_utf8(prompt.into_output()).unwrap())
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("\n"), Some(true));
        assert_eq!(parse_answer("Y\n"), Some(true));
        assert_eq!(parse_answer("YES"), Some(true));
        assert_eq!(parse_answer("ye"), Some(true));
        assert_eq!(parse_answer("No\n"), Some(false));
        assert_eq!(parse_answer("n"), Some(false));
        assert_eq!(parse_answer("maybe"), None);
        assert_eq!(parse_answer("nope"), None);
    }

    #[test]
    fn test_default_is_yes() {
        let (answer, output) = ask("\n");
        assert!(answer);
        assert_eq!(output, "Save model? [Y/n] ");
    }

    #[test]
    fn test_reprompts_until_valid() {
        let (answer, output) = ask("maybe\nsure\nN\n");
        assert!(!answer);
        assert_eq!(output.matches("Save model? [Y/n] ").count(), 3);
        assert_eq!(output.matches("Please respond with").count(), 2);
    }

    #[test]
    fn test_end_of_input_is_no() {
        let (answer, _) = ask("");
        assert!(!answer);
    }

    #[test]
    fn test_closure_decides() {
        let mut asked = Vec::new();
        let mut decide = |question: &str| {
            asked.push(question.to_string());
            true
        };
        assert!(decide.confirm("Save model?").unwrap());
        assert_eq!(asked, vec!["Save model?"]);
    }

    #[test]
    fn test_fixed_answer() {
        assert!(FixedAnswer(true).confirm("Save model?").unwrap());
        assert!(!FixedAnswer(false).confirm("Save model?").unwrap());
    }
}
