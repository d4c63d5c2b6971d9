use crate::utils::error::Result;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::collections::HashSet;

pub const DEFAULT_OPEN_MARKER: &str = "<mark>";
pub const DEFAULT_CLOSE_MARKER: &str = "</mark>";

/// Distinct whitespace-separated terms, longest first so a compound term is
/// preferred over any of its substrings at the same position.
pub fn split_terms(keywords: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut terms: Vec<String> = keywords
        .split_whitespace()
        .filter(|term| seen.insert(term.to_lowercase()))
        .map(str::to_string)
        .collect();
    terms.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
    terms
}

/// Both the keyword filter and the highlighter compile through here, so they
/// fold case identically and a kept review is always one that gets marked.
fn case_insensitive(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

/// Matches `literal` anywhere, ignoring case the way highlighting does.
pub fn literal_matcher(literal: &str) -> Result<Regex> {
    case_insensitive(&regex::escape(literal))
}

/// Compiled keyword alternation plus the markers wrapped around each match.
#[derive(Debug, Clone)]
pub struct Highlighter {
    pattern: Option<Regex>,
    open: String,
    close: String,
}

impl Highlighter {
    pub fn new(keywords: &str) -> Result<Self> {
        Self::with_markers(keywords, DEFAULT_OPEN_MARKER, DEFAULT_CLOSE_MARKER)
    }

    pub fn with_markers(keywords: &str, open: &str, close: &str) -> Result<Self> {
        let terms = split_terms(keywords);
        let pattern = if terms.is_empty() {
            None
        } else {
            let alternation = terms
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            Some(case_insensitive(&alternation)?)
        };

        Ok(Self {
            pattern,
            open: open.to_string(),
            close: close.to_string(),
        })
    }

    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn highlight<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match &self.pattern {
            Some(re) => re.replace_all(text, |caps: &regex::Captures| {
                format!("{}{}{}", self.open, &caps[0], self.close)
            }),
            None => Cow::Borrowed(text),
        }
    }

    /// Remove this highlighter's markers again.
    pub fn strip(&self, marked: &str) -> String {
        marked.replace(&self.open, "").replace(&self.close, "")
    }
}

/// One-shot highlight with the default markers.
pub fn highlight(text: &str, keywords: &str) -> Result<String> {
    Ok(Highlighter::new(keywords)?.highlight(text).into_owned())
}
