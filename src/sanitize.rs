//! Parameter sanitization for extracted file and process names.
//!
//! Strips quoting and the shell metacharacters that would let a spoken
//! parameter smuggle redirection, piping, or command chaining into an
//! invocation. This stage does NOT canonicalize `..` segments; path
//! traversal is out of scope here and handled (or deliberately not) by
//! the caller.

/// Shell metacharacters that are never allowed to survive sanitization
/// and that disqualify a phrase from raw passthrough.
pub const FORBIDDEN_CHARS: [char; 6] = ['&', '|', ';', '>', '<', '`'];

/// Cleans a raw parameter: trims whitespace, strips surrounding single
/// and double quotes, then removes every forbidden metacharacter.
///
/// Spaces inside the name are kept intact.
#[must_use]
pub fn sanitize_name(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('"').trim_matches('\'');
    trimmed
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .collect()
}

/// Returns `true` if the text contains any forbidden metacharacter.
///
/// Used by the passthrough rule: a phrase is only eligible for verbatim
/// execution when this returns `false`.
#[must_use]
pub fn contains_forbidden(text: &str) -> bool {
    text.chars().any(|c| FORBIDDEN_CHARS.contains(&c))
}
