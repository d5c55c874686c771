//! Numbered list prompts on stdin/stdout.

use std::io::{BufRead, Write};

use anyhow::{Result, bail};

/// Ask `message` and return the index of the chosen entry.
///
/// Choices are numbered from 1. Invalid answers repeat the question; end of
/// input aborts.
pub fn select<R, W>(input: &mut R, output: &mut W, message: &str, choices: &[String]) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    if choices.is_empty() {
        bail!("nothing to choose from for: {message}");
    }

    loop {
        writeln!(output, "? {message}")?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(output, "  {}) {}", i + 1, choice)?;
        }
        write!(output, "Answer [1-{}]: ", choices.len())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("no answer given for: {message}");
        }
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=choices.len()).contains(&n) => return Ok(n - 1),
            _ => writeln!(output, "Please enter a number between 1 and {}.", choices.len())?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<String> {
        vec!["Jasmine".to_string(), "Basil".to_string()]
    }

    #[test]
    fn test_select_by_number() {
        let mut input = "2\n".as_bytes();
        let mut output = Vec::new();
        let index = select(&mut input, &mut output, "Which cohort?", &choices()).unwrap();
        assert_eq!(index, 1);

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("? Which cohort?"));
        assert!(shown.contains("  1) Jasmine"));
        assert!(shown.contains("  2) Basil"));
    }

    #[test]
    fn test_select_repeats_on_invalid_answer() {
        let mut input = "zero\n3\n1\n".as_bytes();
        let mut output = Vec::new();
        let index = select(&mut input, &mut output, "Which cohort?", &choices()).unwrap();
        assert_eq!(index, 0);
        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown.matches("Please enter a number between 1 and 2.").count(), 2);
    }

    #[test]
    fn test_select_fails_on_eof() {
        let mut input = "".as_bytes();
        let mut output = Vec::new();
        assert!(select(&mut input, &mut output, "Which cohort?", &choices()).is_err());
    }

    #[test]
    fn test_select_without_choices() {
        let mut input = "1\n".as_bytes();
        let mut output = Vec::new();
        assert!(select(&mut input, &mut output, "Which student?", &[]).is_err());
    }
}
