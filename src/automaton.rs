use std::collections::BTreeSet;

use itertools::Itertools;

use crate::prelude::*;

/// The transition index, i.e. the nondeterministic transition function.
pub mod index;
pub use index::{successors, TransitionIndex};

/// Helper for assembling and validating automata from raw descriptions.
pub mod builder;
pub use builder::{AutomatonBuilder, Targets};

/// A transition leads from a `source` state on a `label` to a set of `targets`. Several
/// transitions may share a source and label, lookup then unions their targets.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    /// The state in which the transition originates.
    pub source: StateId,
    /// Symbol that is read, or epsilon.
    pub label: Label,
    /// The states that can be reached, in the order in which they are stored.
    pub targets: Vec<StateId>,
}

impl Transition {
    /// Creates a new transition.
    pub fn new<L, I>(source: StateId, label: L, targets: I) -> Self
    where
        L: Into<Label>,
        I: IntoIterator<Item = StateId>,
    {
        Self {
            source,
            label: label.into(),
            targets: targets.into_iter().collect(),
        }
    }

    /// Returns true if the transition can be taken without reading a symbol.
    pub fn is_epsilon(&self) -> bool {
        self.label.is_epsilon()
    }
}

impl std::fmt::Debug for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.source,
            self.label,
            StateId::show_collection(self.targets.iter())
        )
    }
}

impl Show for Transition {
    fn show(&self) -> String {
        format!("{self:?}")
    }
}

/// A finite automaton over textual symbols. Depending on its transitions, it may be
/// nondeterministic and contain epsilon transitions, or it may be a (complete) DFA.
///
/// The states are kept in the order in which they were added, which is also the order
/// in which they appear in tables and graph descriptions. Transitions are stored as an
/// ordered sequence and are never merged on insertion.
#[derive(Clone, PartialEq, Eq)]
pub struct Automaton {
    pub(crate) initial: StateId,
    pub(crate) finals: BTreeSet<StateId>,
    pub(crate) states: Vec<StateId>,
    pub(crate) alphabet: BTreeSet<Symbol>,
    pub(crate) transitions: Vec<Transition>,
}

impl Automaton {
    /// Creates an automaton from its parts without any validation. The initial state is
    /// added to the states if it is missing, duplicate states are dropped. For a checked
    /// construction from raw text, use [`AutomatonBuilder`].
    pub fn new<Q, A, F, T>(
        initial: StateId,
        states: Q,
        alphabet: A,
        finals: F,
        transitions: T,
    ) -> Self
    where
        Q: IntoIterator<Item = StateId>,
        A: IntoIterator<Item = Symbol>,
        F: IntoIterator<Item = StateId>,
        T: IntoIterator<Item = Transition>,
    {
        let mut out = Self {
            initial: initial.clone(),
            finals: finals.into_iter().collect(),
            states: vec![],
            alphabet: alphabet.into_iter().collect(),
            transitions: transitions.into_iter().collect(),
        };
        out.add_state(initial);
        for q in states {
            out.add_state(q);
        }
        out
    }

    /// Returns a builder for assembling an automaton from raw names.
    pub fn builder() -> AutomatonBuilder {
        AutomatonBuilder::default()
    }

    /// The initial state.
    pub fn initial(&self) -> &StateId {
        &self.initial
    }

    /// The set of final (accepting) states.
    pub fn finals(&self) -> &BTreeSet<StateId> {
        &self.finals
    }

    /// All states in the order in which they were added.
    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    /// The alphabet, which never contains epsilon.
    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    /// All transitions in the order in which they are stored.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns true if `state` is one of the states of `self`.
    pub fn contains_state(&self, state: &StateId) -> bool {
        self.states.contains(state)
    }

    /// Returns true if `state` is accepting. A composite state is looked up as a whole, its
    /// members are not consulted.
    pub fn is_final(&self, state: &StateId) -> bool {
        self.finals.contains(state)
    }

    /// Returns true if some transition is labelled with epsilon.
    pub fn has_epsilon_transitions(&self) -> bool {
        self.transitions.iter().any(Transition::is_epsilon)
    }

    /// Computes the successors of `state` on `label` by scanning all transitions.
    /// When many lookups are performed, build a [`TransitionIndex`] once instead.
    pub fn successors<L: Into<Label>>(&self, state: &StateId, label: L) -> Vec<StateId> {
        successors(state, &label.into(), &self.transitions)
    }

    /// Builds the [`TransitionIndex`] of `self`.
    pub fn index(&self) -> TransitionIndex {
        TransitionIndex::new(&self.transitions)
    }

    /// Returns true if there are no epsilon transitions and every state has at most one
    /// successor on each symbol.
    pub fn is_deterministic(&self) -> bool {
        if self.has_epsilon_transitions() {
            return false;
        }
        let index = self.index();
        self.states.iter().all(|q| {
            self.alphabet
                .iter()
                .all(|a| index.successors(q, &Label::from(a)).len() <= 1)
        })
    }

    /// Returns true if `self` is deterministic and every state has exactly one successor
    /// on every symbol.
    pub fn is_complete(&self) -> bool {
        if self.has_epsilon_transitions() {
            return false;
        }
        let index = self.index();
        self.states.iter().all(|q| {
            self.alphabet
                .iter()
                .all(|a| index.successors(q, &Label::from(a)).len() == 1)
        })
    }

    pub(crate) fn add_state(&mut self, state: StateId) -> bool {
        if self.states.contains(&state) {
            false
        } else {
            self.states.push(state);
            true
        }
    }

    /// Removes `remove` and all transitions leaving it, redirects every transition that
    /// leads into `remove` to `replace` instead.
    pub(crate) fn merge_into(&mut self, remove: &StateId, replace: &StateId) {
        self.states.retain(|q| q != remove);
        self.transitions.retain(|t| &t.source != remove);
        for target in self
            .transitions
            .iter_mut()
            .flat_map(|t| t.targets.iter_mut())
            .filter(|target| **target == *remove)
        {
            *target = replace.clone();
        }
        self.finals.remove(remove);
    }
}

impl std::fmt::Debug for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "initial {}, final {}",
            self.initial,
            StateId::show_collection(self.finals.iter())
        )?;
        write!(
            f,
            "{}",
            self.transitions.iter().map(|t| format!("{t:?}")).join("\n")
        )
    }
}

impl Show for Automaton {
    fn show(&self) -> String {
        self.transition_table().to_string()
    }
}
