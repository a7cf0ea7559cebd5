use super::{push_similar, Fragment, Hint, HintMismatch, TieBreak};

pub(super) fn anchored(
    old: &str,
    new: &str,
    hint: Hint<'_>,
    context: Option<usize>,
    tie_break: TieBreak,
) -> Result<Vec<Fragment>, HintMismatch> {
    if let Some(fragments) = every_occurrence(old, new, hint) {
        return Ok(fragments);
    }

    let candidates = candidates(old, new, hint);
    let chosen = match (tie_break, context) {
        (TieBreak::ClosestContext, Some(anchor)) => candidates
            .iter()
            .copied()
            .min_by_key(|&p| (p.abs_diff(anchor), p)),
        _ => candidates.first().copied(),
    };
    let Some(pos) = chosen else {
        return Err(HintMismatch {
            from_text: hint.from_text.to_string(),
            to_text: hint.to_text.to_string(),
        });
    };

    let mut fragments = Vec::with_capacity(3);
    push_similar(&mut fragments, &new[..pos]);
    fragments.push(Fragment::changed(hint.from_text, hint.to_text));
    push_similar(&mut fragments, &new[pos + hint.to_text.len()..]);
    Ok(fragments)
}

/// The reduction rewrote every occurrence of `from_text` at once
fn every_occurrence(old: &str, new: &str, hint: Hint<'_>) -> Option<Vec<Fragment>> {
    if hint.from_text.is_empty() || !old.contains(hint.from_text) {
        return None;
    }
    if old.replace(hint.from_text, hint.to_text) != new {
        return None;
    }

    let mut fragments = Vec::new();
    let mut last = 0;
    for (pos, _) in old.match_indices(hint.from_text) {
        push_similar(&mut fragments, &old[last..pos]);
        fragments.push(Fragment::changed(hint.from_text, hint.to_text));
        last = pos + hint.from_text.len();
    }
    push_similar(&mut fragments, &old[last..]);
    Some(fragments)
}

/// Offsets `p` in `new` where `to_text` sits and putting `from_text` back
/// there gives exactly `old`
fn candidates(old: &str, new: &str, hint: Hint<'_>) -> Vec<usize> {
    let (from, to) = (hint.from_text, hint.to_text);
    if old.len() + to.len() != new.len() + from.len() {
        return Vec::new();
    }

    new.char_indices()
        .map(|(p, _)| p)
        .chain(std::iter::once(new.len()))
        .filter(|&p| {
            let (prefix, rest) = new.split_at(p);
            let Some(suffix) = rest.strip_prefix(to) else {
                return false;
            };
            old.strip_prefix(prefix)
                .and_then(|o| o.strip_prefix(from))
                .is_some_and(|o| o == suffix)
        })
        .collect()
}
