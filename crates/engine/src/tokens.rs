//! Token scanning and token-set diffing.
//!
//! Tokens have the form `[group:path]` where both segments are lowercase
//! `[a-z0-9_]` runs and the path may contain further `:` separators, for
//! example `[message:author:name]`. Anything else — including `@{...}`
//! pseudo-placeholders — is plain text, not a token.

use indexmap::IndexSet;
use missive_types::MessageTemplate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([a-z0-9_]+):([a-z0-9_]+(?::[a-z0-9_]+)*)\]").expect("token pattern"));

/// A single parsed token occurrence.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Token {
    /// Leading segment (for example `message`).
    pub group: String,
    /// Remaining path, colon-separated (for example `author:name`).
    pub path: String,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.group, self.path)
    }
}

/// Extract every token occurrence from a string, in order of appearance.
pub fn scan_tokens(text: &str) -> Vec<Token> {
    TOKEN_PATTERN
        .captures_iter(text)
        .map(|captures| Token {
            group: captures[1].to_string(),
            path: captures[2].to_string(),
        })
        .collect()
}

/// The deduplicated token set of a template's text rows, as full bracketed
/// strings in first-appearance order.
pub fn template_tokens(template: &MessageTemplate) -> IndexSet<String> {
    let mut tokens = IndexSet::new();
    for row in &template.text {
        for token in scan_tokens(row) {
            tokens.insert(token.to_string());
        }
    }
    tokens
}

/// Difference between two template revisions' token sets.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TokenDiff {
    /// Tokens present in the new revision but not the old one.
    pub added: IndexSet<String>,
    /// Tokens present in the old revision but not the new one.
    pub removed: IndexSet<String>,
}

impl TokenDiff {
    /// Returns `true` when the two revisions share the same token set.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Diff two token sets, preserving each set's ordering in the result.
pub fn diff_token_sets(old: &IndexSet<String>, new: &IndexSet<String>) -> TokenDiff {
    TokenDiff {
        added: new.difference(old).cloned().collect(),
        removed: old.difference(new).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_tokens_in_order() {
        let tokens = scan_tokens("Hi [message:author:name], created [message:created].");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].group, "message");
        assert_eq!(tokens[0].path, "author:name");
        assert_eq!(tokens[1].to_string(), "[message:created]");
    }

    #[test]
    fn invalid_syntax_is_not_a_token() {
        assert!(scan_tokens("@{message:author:name}").is_empty());
        assert!(scan_tokens("[message]").is_empty());
        assert!(scan_tokens("[Message:Author]").is_empty());
        assert!(scan_tokens("[message:]").is_empty());
    }

    #[test]
    fn template_tokens_deduplicate_across_rows() {
        let template = MessageTemplate::new(
            "dummy_message",
            "Dummy test",
            vec![
                "[message:author:name] wrote:".to_string(),
                "signed, [message:author:name] on [message:created]".to_string(),
            ],
        );
        let tokens = template_tokens(&template);
        let collected: Vec<&String> = tokens.iter().collect();
        assert_eq!(collected, ["[message:author:name]", "[message:created]"]);
    }

    #[test]
    fn diff_reports_added_and_removed() {
        let old: IndexSet<String> = ["[message:id]".to_string(), "[message:author:name]".to_string()]
            .into_iter()
            .collect();
        let new: IndexSet<String> = ["[message:author:name]".to_string(), "[message:created]".to_string()]
            .into_iter()
            .collect();

        let diff = diff_token_sets(&old, &new);
        assert_eq!(diff.added.iter().collect::<Vec<_>>(), ["[message:created]"]);
        assert_eq!(diff.removed.iter().collect::<Vec<_>>(), ["[message:id]"]);
        assert!(!diff.is_empty());
        assert!(diff_token_sets(&new, &new).is_empty());
    }
}
