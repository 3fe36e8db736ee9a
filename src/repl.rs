//! Menu-driven interactive loop.
//!
//! Input is consumed one whitespace-separated token per prompt, so
//! `b a 5 3` on a single line answers four prompts at once.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use anyhow::Context as _;

use crate::history;
use crate::session::{Menu, OpCode, Request, Session};

struct Tokens<R> {
    input: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    const fn new(input: R) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
        }
    }

    /// Next token, or `None` at end of input.
    fn next_token(&mut self) -> anyhow::Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            let mut line = String::new();
            if self
                .input
                .read_line(&mut line)
                .context("failed to read input")?
                == 0
            {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }
}

enum Flow {
    Continue,
    EndOfInput,
}

fn prompt(out: &mut impl Write, text: &str) -> anyhow::Result<()> {
    write!(out, "{text}")?;
    out.flush()?;
    Ok(())
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c.to_ascii_lowercase()),
        _ => None,
    }
}

fn run_operation<R: BufRead, W: Write>(
    menu: Menu,
    tokens: &mut Tokens<R>,
    out: &mut W,
    session: &mut Session,
) -> anyhow::Result<Flow> {
    match menu {
        Menu::Basic => {
            writeln!(out, "\n--- Basic Operations ---")?;
            prompt(
                out,
                "(A)ddition, (S)ubtraction, (M)ultiplication, (D)ivision: ",
            )?;
        }
        Menu::Advanced => {
            writeln!(out, "\n--- Advanced Operations ---")?;
            prompt(out, "(P)ower, (R)oot: ")?;
        }
    }

    let Some(code) = tokens.next_token()? else {
        return Ok(Flow::EndOfInput);
    };
    let Some(op) = OpCode::parse_in(menu, &code) else {
        writeln!(out, "Invalid operation.")?;
        return Ok(Flow::Continue);
    };

    let [first_prompt, second_prompt] = op.prompts();
    prompt(out, first_prompt)?;
    let Some(first) = tokens.next_token()? else {
        return Ok(Flow::EndOfInput);
    };
    prompt(out, second_prompt)?;
    let Some(second) = tokens.next_token()? else {
        return Ok(Flow::EndOfInput);
    };

    let request = match Request::from_operands(op, &first, &second) {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!("rejected operands: {e:#}");
            writeln!(out, "Invalid number.")?;
            return Ok(Flow::Continue);
        }
    };

    match session.perform(&request) {
        Ok(record) => {
            tracing::debug!(operation = %op, expression = %record.expression, "recorded");
            writeln!(out, "Result: {}", record.result)?;
        }
        Err(e) => writeln!(out, "{}", e.user_message())?,
    }
    Ok(Flow::Continue)
}

/// Drive the main menu until the user exits or input ends.
///
/// Saving is left to the caller, which owns the storage path.
///
/// # Errors
/// Returns an error only if reading `input` or writing `out` fails.
pub fn run<R: BufRead, W: Write>(
    input: R,
    mut out: W,
    session: &mut Session,
) -> anyhow::Result<()> {
    let mut tokens = Tokens::new(input);
    loop {
        writeln!(out, "\n===== Calculator Menu =====")?;
        writeln!(out, "(B)asic, (A)dvanced, (H)istory, (E)xit")?;
        prompt(&mut out, "Choice: ")?;

        let Some(choice) = tokens.next_token()? else {
            writeln!(out)?;
            return Ok(());
        };

        let flow = match single_char(&choice) {
            Some('b') => run_operation(Menu::Basic, &mut tokens, &mut out, session)?,
            Some('a') => run_operation(Menu::Advanced, &mut tokens, &mut out, session)?,
            Some('h') => {
                history::display(session.history(), &mut out)?;
                Flow::Continue
            }
            Some('e') => return Ok(()),
            _ => {
                writeln!(out, "Invalid choice. Try again.")?;
                Flow::Continue
            }
        };

        if let Flow::EndOfInput = flow {
            writeln!(out)?;
            return Ok(());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::history::HistoryLog;
    use crate::root::RootOptions;

    fn fixed_clock() -> String {
        "2024-01-15 14:32:07".to_string()
    }

    fn transcript(input: &str) -> (String, Session) {
        let mut session =
            Session::new(HistoryLog::new(), RootOptions::default()).with_clock(fixed_clock);
        let mut out = Vec::new();
        run(input.as_bytes(), &mut out, &mut session).unwrap();
        (String::from_utf8(out).unwrap(), session)
    }

    #[test]
    fn basic_addition_is_recorded() {
        let (out, session) = transcript("b\na\n5\n3\ne\n");
        assert!(out.contains("--- Basic Operations ---"));
        assert!(out.contains("Enter first number: "));
        assert!(out.contains("Result: 8\n"));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().records()[0].expression, "5 + 3");
    }

    #[test]
    fn tokens_may_share_a_line() {
        let (out, session) = transcript("B D 17 5 E");
        assert!(out.contains("Result: 17 / 5 = 3 R 2\n"));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn advanced_power_and_root() {
        let (out, session) = transcript("a p 2 10\na r 27 3\ne\n");
        assert!(out.contains("Enter base: "));
        assert!(out.contains("Enter root index: "));
        assert!(out.contains("Result: 1024.000000\n"));
        assert!(out.contains("Result: 3.000000\n"));
        let ops: Vec<&str> = session
            .history()
            .iter()
            .map(|r| r.operation.as_str())
            .collect();
        assert_eq!(ops, ["Power", "Root"]);
    }

    #[test]
    fn division_by_zero_reported_and_recorded() {
        let (out, session) = transcript("b d 4 0 e");
        assert!(out.contains("Result: Error: Division by zero\n"));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn root_error_reported_not_recorded() {
        let (out, session) = transcript("a r -16 2 e");
        assert!(out.contains("Error: even root of negative number\n"));
        assert!(session.history().is_empty());
    }

    #[test]
    fn invalid_selections_keep_session_alive() {
        let (out, session) = transcript("x\nb\nq\na\nz\nb a 1 1 e");
        assert!(out.contains("Invalid choice. Try again.\n"));
        assert_eq!(out.matches("Invalid operation.\n").count(), 2);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn advanced_menu_rejects_basic_codes() {
        let (out, session) = transcript("a a e");
        assert!(out.contains("Invalid operation.\n"));
        assert!(session.history().is_empty());
    }

    #[test]
    fn unparsable_number_returns_to_menu() {
        let (out, session) = transcript("b a five 3 e");
        assert!(out.contains("Invalid number.\n"));
        assert!(session.history().is_empty());
        assert_eq!(out.matches("===== Calculator Menu =====").count(), 2);
    }

    #[test]
    fn history_choice_displays_log() {
        let (out, _) = transcript("h b m 6 7 h e");
        assert!(out.contains("No calculations in history.\n"));
        assert!(out.contains("2024-01-15 14:32:07 | Multiplication | 6 * 7 = 42\n"));
    }

    #[test]
    fn end_of_input_mid_operation_stops_cleanly() {
        let (_, session) = transcript("b a 5");
        assert!(session.history().is_empty());
    }

    #[test]
    fn empty_input_ends_immediately() {
        let (out, session) = transcript("");
        assert!(out.contains("Choice: "));
        assert!(session.history().is_empty());
    }
}
