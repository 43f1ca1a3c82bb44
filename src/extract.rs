//! Trailing-parameter extraction from recognized phrases.
//!
//! Given a lowercase-normalized phrase and an ordered list of trigger
//! phrases, pulls out the text following the first trigger that occurs in
//! the phrase, strips filler words the recognizer tends to insert, and
//! normalizes verbal punctuation ("dot" becomes `.`).

/// Filler words removed from an extracted parameter.
const FILLER_WORDS: [&str; 2] = ["called", "named"];

/// Extracts the parameter following the first matching trigger phrase.
///
/// The first trigger in the caller-supplied list that occurs anywhere in
/// the phrase wins; position within the phrase does not rank triggers.
/// Returns `None` when no trigger matches or the remainder is empty after
/// cleanup.
#[must_use]
pub fn extract_param(phrase: &str, triggers: &[&str]) -> Option<String> {
    for trigger in triggers {
        if let Some(pos) = phrase.find(trigger) {
            let tail = phrase[pos + trigger.len()..].trim();
            let cleaned = clean_param(tail);
            return if cleaned.is_empty() { None } else { Some(cleaned) };
        }
    }
    None
}

/// Strips filler words and normalizes spoken punctuation.
fn clean_param(tail: &str) -> String {
    let mut s = tail.to_string();
    for filler in FILLER_WORDS {
        s = s.replace(filler, "");
    }
    // "report dot txt" -> "report.txt"; trailing/leading forms included so
    // both "notes dot txt" and "notes dot" collapse cleanly.
    s = s.replace(" dot ", ".");
    s = s.replace(" dot", ".");
    s = s.replace("dot ", ".");
    s.trim().to_string()
}
