use std::fmt;

/// One chat message, parsed from a three-line record in a `.msg` file.
/// The fields already carry their display decorations: the timestamp is
/// bracketed and the sender ends with `": "`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageRecord {
    pub timestamp: String,
    pub sender: String,
    pub content: String,
}

/// Sentinel for a structurally invalid `.msg` file. Deliberately carries no
/// position or cause: every violation collapses to one generic notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseError;

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("chat history file is corrupt or broken")
    }
}

impl std::error::Error for ParseError {}

/// Parse the full contents of a `.msg` file.
///
/// The grammar is a strict repetition of line triplets prefixed with
/// `Time:`, `Name:`, `Message:` — no blank separators, no trailing junk.
/// Any deviation invalidates the whole file; there is no partial success.
/// An empty file is valid and yields no records.
pub fn parse(text: &str) -> Result<Vec<MessageRecord>, ParseError> {
    let mut records = Vec::new();
    let mut lines = text.lines();

    while let Some(first) = lines.next() {
        // A lone line or pair at the end is a malformed trailing fragment.
        let (Some(second), Some(third)) = (lines.next(), lines.next()) else {
            return Err(ParseError);
        };

        let time = first.strip_prefix("Time:").ok_or(ParseError)?;
        let name = second.strip_prefix("Name:").ok_or(ParseError)?;
        let content = third.strip_prefix("Message:").ok_or(ParseError)?;

        records.push(MessageRecord {
            timestamp: format!("[{time}]"),
            sender: format!("{name}: "),
            content: content.to_string(),
        });
    }

    Ok(records)
}
