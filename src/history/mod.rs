//! Display rows for a trace.
//!
//! Each row is one snapshot of the trace, diffed against the snapshot before
//! it using the step that connects them as the hint. Row `0` is the initial
//! rendering as-is. Rows keep the snapshot index so a selection can be
//! mapped back to a rewind point whatever order they are shown in.

use serde::{Deserialize, Serialize};

use crate::diff::{self, Diff, DiffMode, Fragment, Hint, Removal, TieBreak};
use crate::trace::{TraceError, TraceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowOrder {
    OldestFirst,
    #[default]
    NewestFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    /// Position of the snapshot in the trace
    pub index: usize,
    /// Label of the reduction that produced this snapshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub fragments: Vec<Fragment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removals: Vec<Removal>,
    /// `None` for the initial snapshot, which has no diff
    pub mode: Option<DiffMode>,
}

impl RenderedRow {
    fn initial(text: &str) -> Self {
        Self {
            index: 0,
            label: None,
            fragments: vec![Fragment::similar(text)],
            removals: Vec::new(),
            mode: None,
        }
    }

    fn from_diff(index: usize, label: Option<String>, diff: Diff) -> Self {
        Self {
            index,
            label,
            fragments: diff.fragments,
            removals: diff.removals,
            mode: Some(diff.mode),
        }
    }

    pub fn is_initial(&self) -> bool {
        self.mode.is_none()
    }

    /// Argument to `rewind` that makes this row the current state
    pub fn rewind_target(&self) -> usize {
        self.index + 1
    }

    pub fn new_text(&self) -> String {
        self.fragments.iter().map(Fragment::new_text).collect()
    }

    pub fn old_text(&self) -> String {
        self.as_diff().old_text()
    }

    /// Distinct `(old, new)` pairs, first occurrence first, for the detail callout.
    /// Inline fragments are left untouched.
    pub fn details(&self) -> Vec<(&str, &str)> {
        let mut seen: Vec<(&str, &str)> = Vec::new();
        for fragment in &self.fragments {
            if let Fragment::Changed { old, new } = fragment {
                let pair = (old.as_str(), new.as_str());
                if !seen.contains(&pair) {
                    seen.push(pair);
                }
            }
        }
        seen
    }

    pub fn change_count(&self) -> usize {
        self.fragments.iter().filter(|f| f.is_changed()).count()
    }

    fn as_diff(&self) -> Diff {
        Diff {
            fragments: self.fragments.clone(),
            removals: self.removals.clone(),
            mode: self.mode.unwrap_or(DiffMode::Reflexive),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryRenderer {
    pub order: RowOrder,
    pub tie_break: TieBreak,
}

impl HistoryRenderer {
    pub fn new(order: RowOrder, tie_break: TieBreak) -> Self {
        Self { order, tie_break }
    }

    pub fn render(&self, trace: &TraceStore) -> Vec<RenderedRow> {
        let snapshots = trace.snapshots();
        let Some(first) = snapshots.first() else {
            return Vec::new();
        };

        let mut rows = Vec::with_capacity(snapshots.len());
        rows.push(RenderedRow::initial(&first.rendering));

        let mut context = None;
        for (i, step) in trace.rows().iter().enumerate() {
            let d = diff::diff(
                &snapshots[i].rendering,
                &snapshots[i + 1].rendering,
                Some(Hint::new(&step.from_text, &step.to_text)),
                context,
                self.tie_break,
            );
            context = d.first_change_offset().or(context);
            rows.push(RenderedRow::from_diff(i + 1, step.label.clone(), d));
        }

        if self.order == RowOrder::NewestFirst {
            rows.reverse();
        }
        rows
    }

    /// Diff any two snapshots. Adjacent snapshots use their step as the hint;
    /// anything further apart is aligned word by word.
    pub fn compare(
        &self,
        trace: &TraceStore,
        from: usize,
        to: usize,
    ) -> Result<RenderedRow, TraceError> {
        let snapshots = trace.snapshots();
        for requested in [from, to] {
            if requested >= snapshots.len() {
                return Err(TraceError::OutOfRange {
                    requested,
                    len: snapshots.len(),
                });
            }
        }

        let (old, new) = (&snapshots[from].rendering, &snapshots[to].rendering);
        let adjacent_step = (to == from + 1).then(|| &trace.rows()[from]);
        let d = match adjacent_step {
            Some(step) => diff::diff(
                old,
                new,
                Some(Hint::new(&step.from_text, &step.to_text)),
                None,
                self.tie_break,
            ),
            None => diff::token_diff(old, new),
        };
        let label = adjacent_step.and_then(|s| s.label.clone());
        Ok(RenderedRow::from_diff(to, label, d))
    }
}
