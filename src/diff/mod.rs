//! Classified text diffs between two renderings of a program state.
//!
//! A diff is an ordered list of [`Fragment`]s covering the newer rendering.
//! Joining `Similar` text and `Changed::new` in order always gives back the
//! newer rendering. Joining `Similar` text and `Changed::old` gives back the
//! older one whenever the diff was anchored on a literal match; token diffs
//! also keep the pure removals on the side so the older text can be rebuilt.
//!
//! Two strategies are used:
//! - hint-anchored, when the reduction that produced the newer rendering is
//!   known (`from_text` was replaced by `to_text`)
//! - word-level LCS otherwise, or when the hint does not line up

mod anchored;
mod tokens;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use tokens::tokenize;

/// A classified span of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fragment {
    Similar(String),
    Changed { old: String, new: String },
}

impl Fragment {
    pub fn similar(text: impl Into<String>) -> Self {
        Fragment::Similar(text.into())
    }

    pub fn changed(old: impl Into<String>, new: impl Into<String>) -> Self {
        Fragment::Changed {
            old: old.into(),
            new: new.into(),
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, Fragment::Changed { .. })
    }

    /// Text as it appears in the newer rendering
    pub fn new_text(&self) -> &str {
        match self {
            Fragment::Similar(text) => text,
            Fragment::Changed { new, .. } => new,
        }
    }

    /// Text as it appeared in the older rendering
    pub fn old_text(&self) -> &str {
        match self {
            Fragment::Similar(text) => text,
            Fragment::Changed { old, .. } => old,
        }
    }
}

/// Text present only in the older rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removal {
    /// Byte offset in the newer rendering where the text used to be
    pub offset: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffMode {
    /// Both renderings were identical
    Reflexive,
    /// Located through the reduction's `from_text`/`to_text`
    Anchored,
    /// Word-level alignment
    Token,
}

/// How to pick between several equally valid places for a hinted change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Closest to the previous step's change, leftmost without context
    #[default]
    ClosestContext,
    /// Always the leftmost
    Leftmost,
}

/// What the reduction says it did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint<'a> {
    pub from_text: &'a str,
    pub to_text: &'a str,
}

impl<'a> Hint<'a> {
    pub fn new(from_text: &'a str, to_text: &'a str) -> Self {
        Self { from_text, to_text }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{from_text}` => `{to_text}` does not line up with the renderings")]
pub struct HintMismatch {
    pub from_text: String,
    pub to_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diff {
    pub fragments: Vec<Fragment>,
    /// Pure removals; never rendered, kept to rebuild the older text
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removals: Vec<Removal>,
    pub mode: DiffMode,
}

impl Diff {
    fn reflexive(text: &str) -> Self {
        Self {
            fragments: vec![Fragment::similar(text)],
            removals: Vec::new(),
            mode: DiffMode::Reflexive,
        }
    }

    pub fn new_text(&self) -> String {
        self.fragments.iter().map(Fragment::new_text).collect()
    }

    /// Older rendering, including pure removals
    pub fn old_text(&self) -> String {
        let mut out = String::new();
        let mut removals = self.removals.iter().peekable();
        let mut offset = 0;
        for fragment in &self.fragments {
            match fragment {
                Fragment::Similar(text) => {
                    let end = offset + text.len();
                    let mut cursor = offset;
                    while let Some(removal) = removals.next_if(|r| r.offset < end) {
                        let at = removal.offset.max(cursor);
                        out.push_str(&text[cursor - offset..at - offset]);
                        out.push_str(&removal.text);
                        cursor = at;
                    }
                    out.push_str(&text[cursor - offset..]);
                    offset = end;
                }
                Fragment::Changed { old, new } => {
                    while let Some(removal) = removals.next_if(|r| r.offset <= offset) {
                        out.push_str(&removal.text);
                    }
                    out.push_str(old);
                    offset += new.len();
                }
            }
        }
        for removal in removals {
            out.push_str(&removal.text);
        }
        out
    }

    /// Byte offset, in the newer rendering, of the first changed fragment
    pub fn first_change_offset(&self) -> Option<usize> {
        let mut offset = 0;
        for fragment in &self.fragments {
            if fragment.is_changed() {
                return Some(offset);
            }
            offset += fragment.new_text().len();
        }
        None
    }

    pub fn has_changes(&self) -> bool {
        self.fragments.iter().any(Fragment::is_changed) || !self.removals.is_empty()
    }
}

/// Diff `old` against `new`.
///
/// With a hint the change is anchored on it; `context` is the byte offset of
/// the previous step's change and only matters when the hinted text could
/// sit in more than one place. Without a hint, or when the hint does not
/// line up, this falls back to [`token_diff`].
pub fn diff(
    old: &str,
    new: &str,
    hint: Option<Hint<'_>>,
    context: Option<usize>,
    tie_break: TieBreak,
) -> Diff {
    if old == new {
        return Diff::reflexive(new);
    }
    let Some(hint) = hint else {
        return token_diff(old, new);
    };

    match anchored::anchored(old, new, hint, context, tie_break) {
        Ok(fragments) => Diff {
            fragments,
            removals: Vec::new(),
            mode: DiffMode::Anchored,
        },
        Err(mismatch) => {
            tracing::debug!(%mismatch, "Falling back to token diff");
            token_diff(old, new)
        }
    }
}

/// Word-level LCS diff
pub fn token_diff(old: &str, new: &str) -> Diff {
    if old == new {
        return Diff::reflexive(new);
    }
    tokens::diff(old, new)
}

/// Join adjacent `Similar` fragments and drop empty ones
fn push_similar(fragments: &mut Vec<Fragment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Fragment::Similar(last)) = fragments.last_mut() {
        last.push_str(text);
    } else {
        fragments.push(Fragment::similar(text));
    }
}
