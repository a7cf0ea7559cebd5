//! Word-level LCS alignment.

use super::{push_similar, Diff, DiffMode, Fragment, Removal};

/// Above this many DP cells the middle section is reported as one change.
const MAX_TABLE_CELLS: usize = 4_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Word,
    Space,
    Punct,
}

fn class(c: char) -> Class {
    if c.is_alphanumeric() || c == '_' || c == '\'' {
        Class::Word
    } else if c.is_whitespace() {
        Class::Space
    } else {
        Class::Punct
    }
}

/// Split into identifier/number runs, whitespace runs and single
/// punctuation characters. Concatenating the tokens gives back `text`.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut prev: Option<Class> = None;

    for (i, c) in text.char_indices() {
        let cls = class(c);
        let boundary = match prev {
            None => false,
            Some(Class::Punct) => true,
            Some(p) => p != cls,
        };
        if boundary {
            tokens.push(&text[start..i]);
            start = i;
        }
        prev = Some(cls);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op<'a> {
    Keep(&'a str),
    Remove(&'a str),
    Insert(&'a str),
}

pub(super) fn diff(old: &str, new: &str) -> Diff {
    let a = tokenize(old);
    let b = tokenize(new);

    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let mut ops: Vec<Op<'_>> = a[..prefix].iter().map(|&t| Op::Keep(t)).collect();
    ops.extend(align(&a[prefix..a.len() - suffix], &b[prefix..b.len() - suffix]));
    ops.extend(a[a.len() - suffix..].iter().map(|&t| Op::Keep(t)));

    build(&ops)
}

fn align<'a>(a: &[&'a str], b: &[&'a str]) -> Vec<Op<'a>> {
    let (n, m) = (a.len(), b.len());
    if n == 0 || m == 0 || (n + 1).saturating_mul(m + 1) > MAX_TABLE_CELLS {
        if n > 0 && m > 0 {
            tracing::debug!(old_tokens = n, new_tokens = m, "Token diff too large, reporting one change");
        }
        let mut ops: Vec<Op<'a>> = a.iter().map(|&t| Op::Remove(t)).collect();
        ops.extend(b.iter().map(|&t| Op::Insert(t)));
        return ops;
    }

    // lcs[i][j] = LCS length of a[i..] and b[j..]
    let width = m + 1;
    let mut lcs = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i * width + j] = if a[i] == b[j] {
                lcs[(i + 1) * width + j + 1] + 1
            } else {
                lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            ops.push(Op::Keep(a[i]));
            i += 1;
            j += 1;
        } else if lcs[(i + 1) * width + j] >= lcs[i * width + j + 1] {
            ops.push(Op::Remove(a[i]));
            i += 1;
        } else {
            ops.push(Op::Insert(b[j]));
            j += 1;
        }
    }
    ops.extend(a[i..].iter().map(|&t| Op::Remove(t)));
    ops.extend(b[j..].iter().map(|&t| Op::Insert(t)));
    ops
}

fn build(ops: &[Op<'_>]) -> Diff {
    let mut fragments = Vec::new();
    let mut removals = Vec::new();
    let mut removed = String::new();
    let mut inserted = String::new();
    // Bytes of the newer rendering covered so far
    let mut emitted = 0;

    let mut flush = |fragments: &mut Vec<Fragment>,
                     removed: &mut String,
                     inserted: &mut String,
                     emitted: &mut usize| {
        if !inserted.is_empty() {
            *emitted += inserted.len();
            fragments.push(Fragment::changed(
                std::mem::take(removed),
                std::mem::take(inserted),
            ));
        } else if !removed.is_empty() {
            removals.push(Removal {
                offset: *emitted,
                text: std::mem::take(removed),
            });
        }
    };

    for op in ops {
        match op {
            Op::Keep(text) => {
                flush(&mut fragments, &mut removed, &mut inserted, &mut emitted);
                push_similar(&mut fragments, text);
                emitted += text.len();
            }
            Op::Remove(text) => removed.push_str(text),
            Op::Insert(text) => inserted.push_str(text),
        }
    }
    flush(&mut fragments, &mut removed, &mut inserted, &mut emitted);

    Diff {
        fragments,
        removals,
        mode: DiffMode::Token,
    }
}
