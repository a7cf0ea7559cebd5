//! Literal string-rewriting engine.
//!
//! Programs are a list of rules plus one entry binding:
//!
//! ```text
//! # comments start with '#'
//! 2 + 3 => 5
//! 5 * 5 => 25
//! main = (2 + 3) * (2 + 3)
//! ```
//!
//! A rule rewrites a literal substring into another literal substring.
//! Applying a choice rewrites every occurrence of its left-hand side at once,
//! so identical sub-expressions are contracted together.

use std::collections::HashMap;

use super::{
    Applied, ChoiceMode, EngineError, ParseOptions, ReductionChoice, ReductionEngine,
    StateHandle, StateId,
};

pub const LEFTMOST_LABEL: &str = "leftmost-outermost";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    lhs: String,
    rhs: String,
}

#[derive(Debug, Clone)]
struct Program {
    rules: Vec<Rule>,
}

#[derive(Debug, Clone)]
struct StateEntry {
    program: usize,
    text: String,
}

#[derive(Debug, Default)]
pub struct RewriteEngine {
    programs: Vec<Program>,
    states: Vec<StateEntry>,
    enumerated: HashMap<StateId, Vec<ReductionChoice>>,
}

impl RewriteEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, id: StateId) -> Result<&StateEntry, EngineError> {
        usize::try_from(id.get())
            .ok()
            .and_then(|i| self.states.get(i))
            .ok_or(EngineError::UnknownState(id))
    }

    fn push_state(&mut self, program: usize, text: String) -> StateHandle {
        let id = StateId::new(self.states.len() as u64);
        self.states.push(StateEntry { program, text });
        StateHandle::new(id)
    }
}

impl ReductionEngine for RewriteEngine {
    fn parse(&mut self, source: &str, options: &ParseOptions) -> Result<StateHandle, EngineError> {
        let (rules, expr) = parse_program(source, &options.entry)?;
        tracing::debug!(rules = rules.len(), entry = %options.entry, "Parsed rewrite program");
        self.programs.push(Program { rules });
        let program = self.programs.len() - 1;
        Ok(self.push_state(program, expr))
    }

    fn render(&self, state: &StateHandle) -> Result<String, EngineError> {
        Ok(self.entry(state.id())?.text.clone())
    }

    fn enumerate_choices(
        &mut self,
        state: &StateHandle,
        mode: ChoiceMode,
    ) -> Result<Vec<ReductionChoice>, EngineError> {
        let entry = self.entry(state.id())?;
        let rules = &self.programs[entry.program].rules;
        let choices = match mode {
            ChoiceMode::All => all_choices(rules, &entry.text),
            ChoiceMode::Single => leftmost_choice(rules, &entry.text).into_iter().collect(),
        };
        self.enumerated.insert(state.id(), choices.clone());
        Ok(choices)
    }

    fn apply_choice(&mut self, state: StateHandle, index: usize) -> Result<Applied, EngineError> {
        let id = state.id();
        let entry = self.entry(id)?;
        let choices = self
            .enumerated
            .get(&id)
            .ok_or(EngineError::ChoicesNotEnumerated(id))?;
        let choice = choices.get(index).ok_or(EngineError::NoSuchChoice {
            state: id,
            index,
            available: choices.len(),
        })?;

        let program = entry.program;
        let text = entry.text.replace(&choice.from_text, &choice.to_text);
        let next = self.push_state(program, text);
        Ok(Applied {
            retired: state.retire(),
            next,
        })
    }
}

fn all_choices(rules: &[Rule], text: &str) -> Vec<ReductionChoice> {
    let mut choices: Vec<ReductionChoice> = Vec::new();
    for (n, rule) in rules.iter().enumerate() {
        if !text.contains(&rule.lhs) {
            continue;
        }
        if choices
            .iter()
            .any(|c| c.from_text == rule.lhs && c.to_text == rule.rhs)
        {
            continue;
        }
        choices.push(
            ReductionChoice::new(choices.len(), &rule.lhs, &rule.rhs)
                .with_label(format!("rule {}", n + 1)),
        );
    }
    choices
}

fn leftmost_choice(rules: &[Rule], text: &str) -> Option<ReductionChoice> {
    rules
        .iter()
        .filter_map(|rule| text.find(&rule.lhs).map(|pos| (pos, rule)))
        // Earliest start wins; among those the widest match is the outermost.
        .min_by(|(a_pos, a), (b_pos, b)| a_pos.cmp(b_pos).then(b.lhs.len().cmp(&a.lhs.len())))
        .map(|(_, rule)| ReductionChoice::new(0, &rule.lhs, &rule.rhs).with_label(LEFTMOST_LABEL))
}

fn parse_program(source: &str, entry: &str) -> Result<(Vec<Rule>, String), EngineError> {
    let mut rules = Vec::new();
    let mut expr: Option<String> = None;

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        if let Some((lhs, rhs)) = line.split_once("=>") {
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if lhs.is_empty() {
                return Err(EngineError::parse(format!(
                    "line {line_no}: rule has an empty left-hand side"
                )));
            }
            if lhs == rhs {
                return Err(EngineError::parse(format!(
                    "line {line_no}: rule `{lhs}` rewrites to itself"
                )));
            }
            rules.push(Rule {
                lhs: lhs.to_string(),
                rhs: rhs.to_string(),
            });
            continue;
        }

        if let Some((name, body)) = line.split_once('=') {
            let name = name.trim();
            if is_identifier(name) {
                if name != entry {
                    tracing::debug!(line = line_no, binding = name, "Ignoring non-entry binding");
                    continue;
                }
                if expr.is_some() {
                    return Err(EngineError::parse(format!(
                        "line {line_no}: `{entry}` is defined more than once"
                    )));
                }
                let body = body.trim();
                if body.is_empty() {
                    return Err(EngineError::parse(format!(
                        "line {line_no}: `{entry}` has an empty expression"
                    )));
                }
                expr = Some(body.to_string());
                continue;
            }
        }

        return Err(EngineError::parse(format!(
            "line {line_no}: expected `lhs => rhs` or `{entry} = expression`"
        )));
    }

    let expr = expr.ok_or_else(|| EngineError::parse(format!("no `{entry}` binding found")))?;
    Ok((rules, expr))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARES: &str = r#"
        # square of a sum
        2 + 3 => 5
        5 * 5 => 25
        main = (2 + 3) * (2 + 3)
    "#;

    fn parse(engine: &mut RewriteEngine, source: &str) -> StateHandle {
        engine.parse(source, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn parses_entry_and_renders_it() {
        let mut engine = RewriteEngine::new();
        let state = parse(&mut engine, SQUARES);
        assert_eq!(engine.render(&state).unwrap(), "(2 + 3) * (2 + 3)");
    }

    #[test]
    fn missing_entry_is_a_parse_error() {
        let mut engine = RewriteEngine::new();
        let err = engine
            .parse("1 => 2\n", &ParseOptions::default())
            .unwrap_err();
        assert!(err.is_parse());
        assert_eq!(err.to_string(), "no `main` binding found");
    }

    #[test]
    fn custom_entry_name() {
        let mut engine = RewriteEngine::new();
        let options = ParseOptions {
            entry: "start".to_string(),
        };
        let state = engine.parse("main = a\nstart = b\n", &options).unwrap();
        assert_eq!(engine.render(&state).unwrap(), "b");
    }

    #[test]
    fn rejects_garbage_with_line_number() {
        let mut engine = RewriteEngine::new();
        let err = engine
            .parse("main = 1\n+++\n", &ParseOptions::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 2: expected `lhs => rhs` or `main = expression`"
        );
    }

    #[test]
    fn rejects_identity_rule() {
        let mut engine = RewriteEngine::new();
        let err = engine
            .parse("x => x\nmain = x\n", &ParseOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("rewrites to itself"));
    }

    #[test]
    fn single_mode_offers_leftmost_outermost() {
        let mut engine = RewriteEngine::new();
        let state = parse(
            &mut engine,
            "1 + 1 => 2\n(1 + 1) * 2 => 4\nmain = (1 + 1) * 2\n",
        );
        let choices = engine.enumerate_choices(&state, ChoiceMode::Single).unwrap();
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].from_text, "(1 + 1) * 2");
        assert_eq!(choices[0].label.as_deref(), Some(LEFTMOST_LABEL));
    }

    #[test]
    fn all_mode_lists_matching_rules_once() {
        let mut engine = RewriteEngine::new();
        let state = parse(&mut engine, "a => b\nc => d\na => b\nz => y\nmain = a c a\n");
        let choices = engine.enumerate_choices(&state, ChoiceMode::All).unwrap();
        let pairs: Vec<_> = choices
            .iter()
            .map(|c| (c.index, c.from_text.as_str(), c.to_text.as_str()))
            .collect();
        assert_eq!(pairs, vec![(0, "a", "b"), (1, "c", "d")]);
        assert_eq!(choices[1].label.as_deref(), Some("rule 2"));
    }

    #[test]
    fn apply_rewrites_identical_occurrences_together() {
        let mut engine = RewriteEngine::new();
        let state = parse(&mut engine, SQUARES);
        engine.enumerate_choices(&state, ChoiceMode::Single).unwrap();
        let applied = engine.apply_choice(state, 0).unwrap();
        assert_eq!(engine.render(&applied.next).unwrap(), "(5) * (5)");
        assert_ne!(applied.retired.id(), applied.next.id());
    }

    #[test]
    fn apply_requires_enumeration() {
        let mut engine = RewriteEngine::new();
        let state = parse(&mut engine, SQUARES);
        let id = state.id();
        let err = engine.apply_choice(state, 0).unwrap_err();
        assert_eq!(err, EngineError::ChoicesNotEnumerated(id));
    }

    #[test]
    fn apply_rejects_out_of_range_index() {
        let mut engine = RewriteEngine::new();
        let state = parse(&mut engine, SQUARES);
        engine.enumerate_choices(&state, ChoiceMode::Single).unwrap();
        let err = engine.apply_choice(state, 3).unwrap_err();
        assert!(matches!(err, EngineError::NoSuchChoice { index: 3, available: 1, .. }));
    }

    #[test]
    fn normal_form_has_no_choices() {
        let mut engine = RewriteEngine::new();
        let state = parse(&mut engine, "2 + 3 => 5\nmain = 7\n");
        assert!(engine
            .enumerate_choices(&state, ChoiceMode::All)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn states_from_an_earlier_program_keep_their_rules() {
        let mut engine = RewriteEngine::new();
        let first = parse(&mut engine, "a => b\nmain = a\n");
        let _second = parse(&mut engine, "x => y\nmain = a x\n");
        let choices = engine.enumerate_choices(&first, ChoiceMode::All).unwrap();
        assert_eq!(choices[0].to_text, "b");
    }
}
