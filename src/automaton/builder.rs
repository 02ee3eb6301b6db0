use tracing::{trace, warn};

use crate::{error::BuildError, prelude::*, state::RESERVED};

/// The target states of a raw transition. Normally this is a collection of names, a
/// single name is accepted as well and coerced into a one-element set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Targets(Vec<String>);

impl Targets {
    /// Returns the target names.
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for Targets {
    fn from(value: &str) -> Self {
        warn!("expected a set of target states but got \"{value}\", treating it as a singleton");
        Targets(vec![value.to_string()])
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for Targets {
    fn from(value: [S; N]) -> Self {
        Targets(value.iter().map(|s| s.as_ref().to_string()).collect())
    }
}

impl<S: AsRef<str>> From<Vec<S>> for Targets {
    fn from(value: Vec<S>) -> Self {
        Targets(value.iter().map(|s| s.as_ref().to_string()).collect())
    }
}

impl<S: AsRef<str>> From<&[S]> for Targets {
    fn from(value: &[S]) -> Self {
        Targets(value.iter().map(|s| s.as_ref().to_string()).collect())
    }
}

/// Helper struct for assembling an [`Automaton`] from raw, textual descriptions as they are
/// entered by a user. It collects an initial state, final states, states, alphabet symbols
/// and transitions; [`AutomatonBuilder::build`] then validates the description.
///
/// # Example
/// ```
/// use determinize::prelude::*;
///
/// let nfa = Automaton::builder()
///     .initial("A")
///     .with_finals(["C"])
///     .with_states(["A", "B", "C"])
///     .with_transitions([
///         ("A", "λ", Targets::from(["B"])),
///         ("B", "1", Targets::from(["C"])),
///     ])
///     .build()
///     .unwrap();
/// assert!(nfa.has_epsilon_transitions());
/// assert_eq!(nfa.alphabet().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutomatonBuilder {
    initial: Option<String>,
    finals: Vec<String>,
    states: Vec<String>,
    symbols: Vec<String>,
    transitions: Vec<(String, Label, Targets)>,
}

impl AutomatonBuilder {
    /// Sets the initial state.
    pub fn initial<S: Into<String>>(mut self, state: S) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Adds final states.
    pub fn with_finals<I, S>(mut self, finals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.finals.extend(finals.into_iter().map(Into::into));
        self
    }

    /// Declares states. States that are only mentioned by transitions are added as well
    /// when building, but a warning is emitted for them.
    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// By default, the alphabet consists of the symbols that label at least one transition.
    /// This method can be used to force additional symbols into the alphabet.
    pub fn with_alphabet_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Adds a transition. An empty `label` denotes an epsilon transition.
    pub fn with_transition<S, T>(mut self, source: S, label: &str, targets: T) -> Self
    where
        S: Into<String>,
        T: Into<Targets>,
    {
        self.transitions
            .push((source.into(), Label::parse(label), targets.into()));
        self
    }

    /// Adds an epsilon transition.
    pub fn with_epsilon_transition<S, T>(self, source: S, targets: T) -> Self
    where
        S: Into<String>,
        T: Into<Targets>,
    {
        self.with_transition(source, "", targets)
    }

    /// Adds a list of transitions, given as triples of source, label and targets.
    pub fn with_transitions<I, S, L, T>(self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (S, L, T)>,
        S: Into<String>,
        L: AsRef<str>,
        T: Into<Targets>,
    {
        transitions
            .into_iter()
            .fold(self, |acc, (source, label, targets)| {
                acc.with_transition(source, label.as_ref(), targets)
            })
    }

    /// Validates the description and turns it into an [`Automaton`]. Fails if there is no
    /// initial state, no final state or no transition, if a transition has no target, or if
    /// a state name is empty or uses one of the reserved characters.
    pub fn build(self) -> Result<Automaton, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitial)?;
        if self.finals.is_empty() {
            return Err(BuildError::NoFinalStates);
        }
        if self.transitions.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        let mentioned = std::iter::once(&initial)
            .chain(&self.finals)
            .chain(&self.states)
            .chain(self.transitions.iter().flat_map(|(source, _, targets)| {
                std::iter::once(source).chain(targets.names())
            }));
        for name in mentioned {
            check_name(name)?;
        }

        let mut states: Vec<StateId> = vec![];
        for name in std::iter::once(&initial).chain(&self.states) {
            let q = StateId::simple(name.as_str());
            if !states.contains(&q) {
                states.push(q);
            }
        }

        let mut alphabet = std::collections::BTreeSet::new();
        for raw in &self.symbols {
            match Label::parse(raw) {
                Label::Symbol(sym) => {
                    alphabet.insert(sym);
                }
                Label::Epsilon => warn!("ignoring epsilon in the declared alphabet"),
            }
        }

        let mut transitions = Vec::with_capacity(self.transitions.len());
        for (source, label, targets) in self.transitions {
            if targets.names().is_empty() {
                return Err(BuildError::EmptyTargets {
                    state: source,
                    label,
                });
            }
            if let Some(sym) = label.symbol() {
                alphabet.insert(sym.clone());
            }
            let targets: Vec<StateId> = targets
                .names()
                .iter()
                .map(|name| StateId::simple(name.as_str()))
                .collect();
            let source = StateId::Simple(source);
            for q in std::iter::once(&source).chain(&targets) {
                if !states.contains(q) {
                    warn!("state {q} is used by a transition but was not declared, adding it");
                    states.push(q.clone());
                }
            }
            transitions.push(Transition::new(source, label, targets));
        }

        let finals: Vec<StateId> = self.finals.into_iter().map(StateId::Simple).collect();
        for q in &finals {
            if !states.contains(q) {
                warn!("final state {q} was not declared, adding it");
                states.push(q.clone());
            }
        }

        trace!(
            "built automaton with {} states, {} symbols and {} transitions",
            states.len(),
            alphabet.len(),
            transitions.len()
        );
        Ok(Automaton::new(
            StateId::Simple(initial),
            states,
            alphabet,
            finals,
            transitions,
        ))
    }
}

fn check_name(name: &str) -> Result<(), BuildError> {
    if name.trim().is_empty() {
        return Err(BuildError::EmptyName);
    }
    match name.chars().find(|c| RESERVED.contains(c)) {
        Some(character) => Err(BuildError::ReservedCharacter {
            name: name.to_string(),
            character,
        }),
        None if name == crate::state::TRAP => Err(BuildError::ReservedCharacter {
            name: name.to_string(),
            character: crate::state::TRAP.chars().next().unwrap_or_default(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::BuildError, prelude::*};

    fn base() -> AutomatonBuilder {
        Automaton::builder()
            .initial("A")
            .with_finals(["B"])
            .with_states(["A", "B"])
    }

    #[test_log::test]
    fn rejects_incomplete_descriptions() {
        assert_eq!(
            Automaton::builder()
                .with_finals(["B"])
                .with_transition("A", "a", ["B"])
                .build(),
            Err(BuildError::MissingInitial)
        );
        assert_eq!(
            Automaton::builder()
                .initial("A")
                .with_transition("A", "a", ["B"])
                .build(),
            Err(BuildError::NoFinalStates)
        );
        assert_eq!(base().build(), Err(BuildError::NoTransitions));
    }

    #[test_log::test]
    fn rejects_reserved_characters() {
        let err = base().with_transition("A,1", "a", ["B"]).build();
        assert_eq!(
            err,
            Err(BuildError::ReservedCharacter {
                name: "A,1".to_string(),
                character: ','
            })
        );
        assert!(base().with_transition("A", "a", ["{B}"]).build().is_err());
        assert!(base().with_transition("A", "a", ["∅"]).build().is_err());
        assert_eq!(
            base().with_transition(" ", "a", ["B"]).build(),
            Err(BuildError::EmptyName)
        );
    }

    #[test_log::test]
    fn rejects_empty_targets() {
        let err = base()
            .with_transition("A", "a", Vec::<String>::new())
            .build();
        assert!(matches!(err, Err(BuildError::EmptyTargets { .. })));
    }

    #[test_log::test]
    fn coerces_and_collects() {
        let nfa = base()
            .with_alphabet_symbols(["c", ""])
            .with_transition("A", "a", "B")
            .with_epsilon_transition("B", ["D"])
            .build()
            .unwrap();
        assert_eq!(nfa.successors(&"A".into(), "a"), vec![StateId::from("B")]);
        assert_eq!(
            nfa.alphabet().iter().map(Symbol::as_str).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert!(nfa.contains_state(&"D".into()));
        assert!(nfa.has_epsilon_transitions());
    }
}
