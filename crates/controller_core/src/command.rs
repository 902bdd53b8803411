//! Free-text command parsing for the update channel's side channel.
//!
//! Spoken or typed text is canonicalized and matched against small synonym
//! tables. Anything that matches selects a side-channel action; anything
//! else is a literal search query and is the caller's business.

/// Side-channel action selected by a recognized phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// The "yes" family.
    Accept,
    /// The "no" family.
    Decline,
    /// Hidden trigger words that open the diagnostic overlay.
    Reveal,
}

const ACCEPT_WORDS: &[&str] = &[
    "yes", "yeah", "yep", "yup", "ok", "okay", "sure", "affirmative", "aye",
];

const DECLINE_WORDS: &[&str] = &["no", "nope", "nah", "negative", "cancel", "never mind"];

const REVEAL_WORDS: &[&str] = &["xyzzy", "plugh", "plover", "abracadabra"];

/// Lower-case, strip punctuation, collapse runs of whitespace.
pub fn canonicalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let scrubbed: String = lowered
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    scrubbed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Match canonicalized text against the synonym tables. `None` means the
/// text is not a command; callers treat it as a literal query, never as a
/// failed command.
pub fn parse(text: &str) -> Option<Command> {
    let canonical = canonicalize(text);
    if canonical.is_empty() {
        return None;
    }
    if ACCEPT_WORDS.contains(&canonical.as_str()) {
        return Some(Command::Accept);
    }
    if DECLINE_WORDS.contains(&canonical.as_str()) {
        return Some(Command::Decline);
    }
    if REVEAL_WORDS.contains(&canonical.as_str()) {
        return Some(Command::Reveal);
    }
    None
}

#[cfg(test)]
#[path = "tests/command_tests.rs"]
mod tests;
