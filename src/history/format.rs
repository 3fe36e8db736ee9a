//! One history record per line: `timestamp|operation|expression|result`.
//!
//! The only escapes are `\\`, `\|`, `\n` and `\r`. A backslash is written
//! raw unless the character after it would make it read as one of those, so
//! plain text and hand-edited paths like `C:\tmp` survive a load/save cycle.

use std::iter::Peekable;
use std::str::Chars;

use super::HistoryRecord;

pub const DELIMITER: char = '|';
const ESCAPE: char = '\\';

/// True if a raw backslash followed by `next` would decode as an escape.
const fn needs_escape(next: Option<char>) -> bool {
    matches!(next, None | Some('\\' | '|' | '\n' | '\r' | 'n' | 'r'))
}

fn escape_field(field: &str, out: &mut String) {
    let mut chars = field.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ESCAPE if needs_escape(chars.peek().copied()) => out.push_str("\\\\"),
            DELIMITER => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
}

/// Encode a record as a single line, without the trailing newline.
pub fn encode_line(record: &HistoryRecord) -> String {
    let mut line = String::with_capacity(
        record.timestamp.len()
            + record.operation.len()
            + record.expression.len()
            + record.result.len()
            + 3,
    );
    escape_field(&record.timestamp, &mut line);
    line.push(DELIMITER);
    escape_field(&record.operation, &mut line);
    line.push(DELIMITER);
    escape_field(&record.expression, &mut line);
    line.push(DELIMITER);
    escape_field(&record.result, &mut line);
    line
}

/// Resolve the character(s) following a backslash.
fn unescape(chars: &mut Peekable<Chars<'_>>, field: &mut String) {
    let decoded = match chars.peek() {
        Some('\\') => ESCAPE,
        Some('|') => DELIMITER,
        Some('n') => '\n',
        Some('r') => '\r',
        // Unknown sequence or end of line: the backslash is literal and the
        // next character is read normally.
        _ => {
            field.push(ESCAPE);
            return;
        }
    };
    chars.next();
    field.push(decoded);
}

/// Decode one line leniently.
///
/// The first three unescaped delimiters separate timestamp, operation and
/// expression; everything after the third is the result, where a stray
/// unescaped `|` is kept as-is. Missing trailing fields are empty.
pub fn decode_line(line: &str) -> HistoryRecord {
    let mut fields: [String; 4] = Default::default();
    let mut idx = 0;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => unescape(&mut chars, &mut fields[idx]),
            DELIMITER if idx < 3 => idx += 1,
            _ => fields[idx].push(c),
        }
    }

    let [timestamp, operation, expression, result] = fields;
    HistoryRecord {
        operation,
        expression,
        result,
        timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: &str, op: &str, expr: &str, result: &str) -> HistoryRecord {
        HistoryRecord::new(op, expr, result, ts)
    }

    #[test]
    fn plain_record_is_written_verbatim() {
        let r = record("2024-01-15 14:32:07", "Addition", "5 + 3", "8");
        assert_eq!(encode_line(&r), "2024-01-15 14:32:07|Addition|5 + 3|8");
    }

    #[test]
    fn decode_reference_line() {
        let r = decode_line("2024-01-15 14:32:07|Division|17 / 5|17 / 5 = 3 R 2");
        assert_eq!(r.timestamp, "2024-01-15 14:32:07");
        assert_eq!(r.operation, "Division");
        assert_eq!(r.expression, "17 / 5");
        assert_eq!(r.result, "17 / 5 = 3 R 2");
    }

    #[test]
    fn short_lines_default_to_empty_fields() {
        let r = decode_line("2024-01-15 14:32:07|Root");
        assert_eq!(r.timestamp, "2024-01-15 14:32:07");
        assert_eq!(r.operation, "Root");
        assert_eq!(r.expression, "");
        assert_eq!(r.result, "");

        let empty = decode_line("");
        assert_eq!(empty, record("", "", "", ""));
    }

    #[test]
    fn unescaped_pipe_in_result_is_kept() {
        let r = decode_line("ts|op|expr|a|b");
        assert_eq!(r.result, "a|b");
    }

    #[test]
    fn special_characters_round_trip() {
        let r = record("ts", "Op|x", "a \\ b", "line1\nline2\r|");
        let line = encode_line(&r);
        assert!(!line.contains('\n'));
        assert_eq!(line, "ts|Op\\|x|a \\ b|line1\\nline2\\r\\|");
        assert_eq!(decode_line(&line), r);
    }

    #[test]
    fn dangling_escape_is_literal() {
        let r = decode_line("ts|op|expr|oops\\");
        assert_eq!(r.result, "oops\\");
    }

    #[test]
    fn unknown_escapes_keep_their_backslash() {
        let line = "2024-01-15 14:32:07|Note|C:\\tmp\\x|tab\\t";
        let r = decode_line(line);
        assert_eq!(r.expression, "C:\\tmp\\x");
        assert_eq!(r.result, "tab\\t");
        assert_eq!(encode_line(&r), line);
    }

    #[test]
    fn backslash_before_escape_letter_is_escaped() {
        let r = record("ts", "Note", "dir\\new", "end\\");
        let line = encode_line(&r);
        assert_eq!(line, "ts|Note|dir\\\\new|end\\\\");
        assert_eq!(decode_line(&line), r);
    }

    #[test]
    fn root_symbol_passes_through() {
        let r = record("ts", "Root", "3√27.000000", "3.000000");
        let line = encode_line(&r);
        assert_eq!(line, "ts|Root|3√27.000000|3.000000");
        assert_eq!(decode_line(&line), r);
    }
}
