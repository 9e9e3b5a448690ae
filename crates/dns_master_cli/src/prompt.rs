//! Yes/no confirmation before destructive commands.

use std::io::{self, BufRead, Write};

/// Asks `question` and returns whether the answer was yes.
///
/// Anything other than `y`/`yes` (case-insensitive), including end of
/// input, counts as no.
pub fn confirm(question: &str, input: &mut impl BufRead, out: &mut impl Write) -> io::Result<bool> {
    write!(out, "{question} [y/N]: ")?;
    out.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        writeln!(out)?;
        return Ok(false);
    }

    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

#[cfg(test)]
mod tests {
    use super::confirm;
    use std::io::Cursor;

    fn ask(answer: &str) -> bool {
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut out = Vec::new();
        confirm("Proceed?", &mut input, &mut out).unwrap()
    }

    #[test]
    fn accepts_yes_variants() {
        assert!(ask("y\n"));
        assert!(ask("YES\n"));
        assert!(ask("  Yes  \n"));
    }

    #[test]
    fn everything_else_is_no() {
        assert!(!ask("n\n"));
        assert!(!ask("\n"));
        assert!(!ask("sure\n"));
        assert!(!ask(""));
    }

    #[test]
    fn prints_question_with_default_hint() {
        let mut input = Cursor::new(b"n\n".to_vec());
        let mut out = Vec::new();
        confirm("Delete it?", &mut input, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Delete it? [y/N]: ");
    }
}
