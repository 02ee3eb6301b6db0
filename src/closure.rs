//! Epsilon closures and the elimination of epsilon transitions.
use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::{math::Map, prelude::*};

/// Computes the epsilon closure of `state`, that is the set of all states that can be
/// reached from `state` using only epsilon transitions. The closure always contains
/// `state` itself and the computation terminates on cyclic epsilon paths.
pub fn epsilon_closure(state: &StateId, transitions: &[Transition]) -> BTreeSet<StateId> {
    ClosureEngine::new(transitions).closure(state)
}

/// Computes epsilon closures over a fixed set of transitions. Closures are memoized, which
/// is sound because the transitions cannot change while the engine borrows them.
#[derive(Debug, Clone)]
pub struct ClosureEngine {
    index: TransitionIndex,
    cache: Map<StateId, BTreeSet<StateId>>,
}

impl ClosureEngine {
    /// Creates an engine for the given transitions.
    pub fn new<'a, I: IntoIterator<Item = &'a Transition>>(transitions: I) -> Self {
        Self {
            index: TransitionIndex::new(transitions),
            cache: Map::default(),
        }
    }

    /// Gives access to the underlying [`TransitionIndex`].
    pub fn index(&self) -> &TransitionIndex {
        &self.index
    }

    /// The epsilon closure of `state`.
    pub fn closure(&mut self, state: &StateId) -> BTreeSet<StateId> {
        if let Some(known) = self.cache.get(state) {
            return known.clone();
        }

        let mut closure = BTreeSet::from([state.clone()]);
        let mut stack = vec![state.clone()];
        while let Some(q) = stack.pop() {
            for target in self.index.successors(&q, &Label::Epsilon) {
                if closure.insert(target.clone()) {
                    stack.push(target.clone());
                }
            }
        }

        self.cache.insert(state.clone(), closure.clone());
        closure
    }

    /// The union of the epsilon closures of all given states.
    pub fn closure_of_set<'a, I>(&mut self, states: I) -> BTreeSet<StateId>
    where
        I: IntoIterator<Item = &'a StateId>,
    {
        let mut out = BTreeSet::new();
        for q in states {
            out.extend(self.closure(q));
        }
        out
    }
}

/// Removes all epsilon transitions from `nfa` while preserving the accepted language.
///
/// If `nfa` has no epsilon transitions, it is returned unchanged. Otherwise, for every
/// state `q` and every symbol `a` a single transition from `q` on `a` is emitted, whose
/// targets are the closures of all `a`-successors of the closure of `q`. Such a transition
/// may have no targets at all, which simply means there is no successor. If a final state
/// is reachable from the initial state by epsilon transitions alone, the initial state
/// becomes final. States, alphabet and initial state stay the same.
pub fn eliminate_epsilon(nfa: Automaton) -> Automaton {
    if !nfa.has_epsilon_transitions() {
        trace!("automaton has no epsilon transitions, nothing to eliminate");
        return nfa;
    }

    let mut engine = ClosureEngine::new(&nfa.transitions);
    let mut transitions = Vec::with_capacity(nfa.states.len() * nfa.alphabet.len());
    for q in &nfa.states {
        let closure = engine.closure(q);
        for sym in &nfa.alphabet {
            let label = Label::from(sym);
            let direct = engine.index().successors_of_set(&closure, &label);
            let targets = engine.closure_of_set(&direct);
            trace!(
                "{q} reaches {} on {sym} after closing",
                StateId::show_collection(targets.iter())
            );
            transitions.push(Transition::new(q.clone(), label, targets));
        }
    }

    let mut finals = nfa.finals;
    if engine
        .closure(&nfa.initial)
        .iter()
        .any(|q| finals.contains(q))
    {
        debug!("initial state {} accepts the empty word", nfa.initial);
        finals.insert(nfa.initial.clone());
    }

    debug!(
        "eliminated epsilon transitions, {} transitions remain",
        transitions.len()
    );
    Automaton {
        initial: nfa.initial,
        finals,
        states: nfa.states,
        alphabet: nfa.alphabet,
        transitions,
    }
}

impl Automaton {
    /// Removes all epsilon transitions, see [`eliminate_epsilon`].
    pub fn without_epsilon(self) -> Automaton {
        eliminate_epsilon(self)
    }

    /// Returns true if `self` accepts the given word. This simulates all runs in parallel
    /// and follows epsilon transitions, so it works for any automaton.
    pub fn accepts<I, S>(&self, word: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let mut engine = ClosureEngine::new(&self.transitions);
        let mut current = engine.closure(&self.initial);
        for sym in word {
            let label = Label::Symbol(sym.into());
            let direct = engine.index().successors_of_set(&current, &label);
            current = engine.closure_of_set(&direct);
            if current.is_empty() {
                return false;
            }
        }
        current.iter().any(|q| self.is_final(q))
    }
}
