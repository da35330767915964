//! Yes/no confirmation prompts

use crate::utils::errors::{Result, SgError};
use dialoguer::Confirm;
use std::io::{self, BufRead, IsTerminal, Write};

const DEFAULT_QUESTION: &str = "WARNING: Are you sure? (yes/no): ";
const DEFAULT_TERMINAL_QUESTION: &str = "WARNING: Are you sure?";
const RETRY_MESSAGE: &str =
    "I'm sorry but I didn't get what you meant, please type (y)es or (n)o and then press enter:";

/// Ask the user to confirm.
///
/// An empty `question` falls back to `WARNING: Are you sure? (yes/no)`. On a
/// terminal this is a dialoguer prompt; when stdin is piped the answer is read
/// line by line with [`ask_for_confirmation_from`], so scripts can feed it.
pub fn ask_for_confirmation(question: &str) -> Result<bool> {
    if io::stdin().is_terminal() {
        let prompt = if question.is_empty() {
            DEFAULT_TERMINAL_QUESTION
        } else {
            question
        };
        return Confirm::new()
            .with_prompt(prompt)
            .wait_for_newline(true)
            .interact()
            .map_err(|e| SgError::Prompt(e.to_string()));
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    ask_for_confirmation_from(&mut stdin.lock(), &mut stdout.lock(), question)
}

/// Line-based confirmation over any reader/writer pair.
///
/// Accepts `y`, `yes`, `n`, `no` in any case and keeps asking until one of
/// them is typed. End of input is an error.
pub fn ask_for_confirmation_from<R, W>(reader: &mut R, writer: &mut W, question: &str) -> Result<bool>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        if question.is_empty() {
            write!(writer, "{}", DEFAULT_QUESTION)?;
        } else {
            writeln!(writer, "{}", question)?;
        }
        writer.flush()?;

        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(SgError::Prompt("no answer was given (end of input)".into()));
        }

        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(writer, "{}", RETRY_MESSAGE)?,
        }
    }
}

/// Confirmation gate for destructive actions: `skip` (e.g. `--quiet`) answers yes
pub fn confirm_unless(skip: bool, question: &str) -> Result<bool> {
    if skip {
        return Ok(true);
    }
    ask_for_confirmation(question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answer(question: &str, input: &str) -> (Result<bool>, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = ask_for_confirmation_from(&mut reader, &mut out, question);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_accepts_all_spellings() {
        let cases = [
            ("yes", true),
            ("YES", true),
            ("y", true),
            ("Y", true),
            ("Yes", true),
            ("no", false),
            ("NO", false),
            ("n", false),
            ("N", false),
        ];
        for (input, want) in cases {
            let (got, _) = answer(&format!("test {}:", input), input);
            assert_eq!(got.unwrap(), want, "input {:?}", input);
        }
    }

    #[test]
    fn test_question_is_printed_on_its_own_line() {
        let (got, out) = answer("Delete pod sg-1-host-1?", "y\n");
        assert!(got.unwrap());
        assert_eq!(out, "Delete pod sg-1-host-1?\n");
    }

    #[test]
    fn test_empty_question_uses_default_prompt() {
        let (got, out) = answer("", "no\n");
        assert!(!got.unwrap());
        assert_eq!(out, "WARNING: Are you sure? (yes/no): ");
    }

    #[test]
    fn test_asks_again_until_valid() {
        let (got, out) = answer("Proceed?", "maybe\n\n  yes  \n");
        assert!(got.unwrap());
        assert_eq!(out.matches("Proceed?").count(), 3);
        assert_eq!(out.matches(RETRY_MESSAGE).count(), 2);
    }

    #[test]
    fn test_end_of_input_is_an_error() {
        let (got, _) = answer("Proceed?", "sure\n");
        assert!(matches!(got, Err(SgError::Prompt(_))));
    }

    #[test]
    fn test_confirm_unless_skips() {
        assert!(confirm_unless(true, "never asked").unwrap());
    }
}
