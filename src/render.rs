use crate::parser::MessageRecord;

/// One atomic renderable unit. The UI consumes these verbatim: it styles
/// them but never re-derives formatting decisions from the records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayFragment {
    Timestamp(String),
    SenderLabel(String),
    /// A whitespace-delimited word and its bold flag. Every non-emoji word
    /// is bold today; the flag is kept as data rather than hardcoded at the
    /// render site.
    PlainWord(String, bool),
    /// Asset identifier from the emoji table, e.g. `"smile_happy.gif"`.
    EmojiToken(&'static str),
    /// Terminates one message's row of fragments.
    LineBreak,
}

/// Extendable token → asset table. Matching is exact equality on a
/// whitespace-delimited token; a token embedded mid-word is not recognized.
const EMOJI_TABLE: &[(&str, &str)] = &[
    (":)", "smile_happy.gif"),
    (":(", "smile_sad.gif"),
];

pub fn emoji_asset(token: &str) -> Option<&'static str> {
    EMOJI_TABLE
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, asset)| *asset)
}

/// Flatten parsed records into the ordered fragment stream the UI renders.
///
/// Per record: timestamp, sender label, one fragment per word of content,
/// then a line break. A sender equal to the *immediately preceding record's*
/// sender collapses to `"..."`. The comparison is never made against the
/// last label actually shown, so a run of three identical senders labels as
/// `[name, "...", "..."]` — each message only looks one back.
pub fn build_fragments(records: &[MessageRecord]) -> Vec<DisplayFragment> {
    let mut fragments = Vec::new();

    for (i, record) in records.iter().enumerate() {
        fragments.push(DisplayFragment::Timestamp(record.timestamp.clone()));

        let label = if i > 0 && records[i - 1].sender == record.sender {
            "...".to_string()
        } else {
            record.sender.clone()
        };
        fragments.push(DisplayFragment::SenderLabel(label));

        for word in record.content.split_whitespace() {
            match emoji_asset(word) {
                Some(asset) => fragments.push(DisplayFragment::EmojiToken(asset)),
                None => fragments.push(DisplayFragment::PlainWord(word.to_string(), true)),
            }
        }

        fragments.push(DisplayFragment::LineBreak);
    }

    fragments
}

#[cfg(test)]
mod tests {
    use super::*;
    use DisplayFragment::*;

    fn record(time: &str, name: &str, content: &str) -> MessageRecord {
        MessageRecord {
            timestamp: format!("[{time}]"),
            sender: format!("{name}: "),
            content: content.to_string(),
        }
    }

    #[test]
    fn fragment_order_per_message() {
        let fragments = build_fragments(&[record("14:02", "alice", "hello world")]);
        assert_eq!(
            fragments,
            vec![
                Timestamp("[14:02]".to_string()),
                SenderLabel("alice: ".to_string()),
                PlainWord("hello".to_string(), true),
                PlainWord("world".to_string(), true),
                LineBreak,
            ]
        );
    }

    #[test]
    fn consecutive_same_sender_collapses_to_ellipsis() {
        let records = [
            record("1", "A", "one"),
            record("2", "A", "two"),
            record("3", "A", "three"),
            record("4", "B", "four"),
        ];
        let labels: Vec<_> = build_fragments(&records)
            .into_iter()
            .filter_map(|f| match f {
                SenderLabel(l) => Some(l),
                _ => None,
            })
            .collect();
        // Each record compares only to its immediate predecessor, so the
        // whole run collapses, not just its tail.
        assert_eq!(labels, vec!["A: ", "...", "...", "B: "]);
    }

    #[test]
    fn known_emoji_tokens_become_images() {
        let fragments = build_fragments(&[record("1", "A", "hi :) there")]);
        assert_eq!(
            fragments[2..5],
            [
                PlainWord("hi".to_string(), true),
                EmojiToken("smile_happy.gif"),
                PlainWord("there".to_string(), true),
            ]
        );
    }

    #[test]
    fn emoji_embedded_mid_word_is_not_recognized() {
        let fragments = build_fragments(&[record("1", "A", "ok:) :(x")]);
        assert_eq!(
            fragments[2..4],
            [
                PlainWord("ok:)".to_string(), true),
                PlainWord(":(x".to_string(), true),
            ]
        );
    }

    #[test]
    fn words_split_on_runs_of_whitespace() {
        let fragments = build_fragments(&[record("1", "A", "a  \t b")]);
        assert_eq!(
            fragments[2..4],
            [
                PlainWord("a".to_string(), true),
                PlainWord("b".to_string(), true),
            ]
        );
    }

    #[test]
    fn empty_records_yield_no_fragments() {
        assert!(build_fragments(&[]).is_empty());
    }

    #[test]
    fn sad_emoji_maps_to_its_asset() {
        assert_eq!(emoji_asset(":("), Some("smile_sad.gif"));
        assert_eq!(emoji_asset(":D"), None);
    }
}
