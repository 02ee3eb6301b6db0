//! The subset (powerset) construction, which turns a nondeterministic automaton into an
//! equivalent deterministic one. Every state of the result stands for the set of states
//! that the nondeterministic automaton can be in after reading some word.
use tracing::{debug, trace};

use crate::{math::Set, prelude::*};

/// Bounds the number of exploration steps a construction may take. Each step takes one
/// state off the worklist and computes all of its outgoing transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StepLimit {
    /// Run until every reachable state has been explored.
    #[default]
    Unlimited,
    /// Stop as soon as the given step is about to be taken. The state taken off the
    /// worklist in that step is discovered, but none of its transitions are computed.
    /// `After(0)` and `After(1)` both stop before anything is explored.
    After(usize),
}

impl StepLimit {
    fn reached(&self, step: usize) -> bool {
        match self {
            StepLimit::Unlimited => false,
            StepLimit::After(limit) => step >= *limit,
        }
    }
}

/// The result of a (possibly interrupted) subset construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Construction {
    dfa: Automaton,
    steps: usize,
    completed: Option<usize>,
}

impl Construction {
    /// The constructed automaton. If the construction was interrupted, it is partial: some
    /// discovered states lack outgoing transitions.
    pub fn dfa(&self) -> &Automaton {
        &self.dfa
    }

    /// Consumes `self` and returns the constructed automaton.
    pub fn into_dfa(self) -> Automaton {
        self.dfa
    }

    /// The number of steps that were started, including the one that hit the limit.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The number of steps a complete construction took, or `None` if it was interrupted.
    /// Replaying with a limit of this value plus one yields the complete automaton.
    pub fn completed_steps(&self) -> Option<usize> {
        self.completed
    }

    /// Returns true if the construction stopped because of its [`StepLimit`].
    pub fn is_interrupted(&self) -> bool {
        self.completed.is_none()
    }
}

/// Performs the subset construction on `nfa`.
///
/// Epsilon transitions are eliminated first. The initial state of the result is the initial
/// state of `nfa`, which is only wrapped into a set if it is not simple. Discovered states are
/// explored in stack order. Every state of the result stands for a set of states of `nfa`,
/// and the states of `nfa` are treated as atomic even if they are composite themselves. For
/// every explored state and every symbol, the successors of all its members are composed
/// into one state. If there are none, a transition into the trap state is emitted instead;
/// the trap is created on first use and loops on every symbol. A state of the result is
/// final if one of its members is final in `nfa`.
///
/// The exploration order only influences the order in which states and transitions appear,
/// never which states, transitions and final states the result has.
pub fn generate_dfa(nfa: &Automaton, limit: StepLimit) -> Construction {
    let nfa = eliminate_epsilon(nfa.clone());
    let index = nfa.index();
    let labels: Vec<Label> = nfa.alphabet.iter().map(Label::from).collect();

    let initial = StateId::singleton(nfa.initial.clone());
    let mut discovered = vec![initial.clone()];
    let mut seen: Set<StateId> = Set::default();
    seen.insert(initial.clone());
    let mut worklist = vec![initial.clone()];
    let mut transitions: Vec<Transition> = vec![];
    let mut steps = 0;
    let mut interrupted = false;

    while let Some(current) = worklist.pop() {
        let members = current.decompose();
        steps += 1;
        if limit.reached(steps) {
            trace!("step limit reached at step {steps} while exploring {current}");
            interrupted = true;
            break;
        }
        trace!("step {steps}: exploring {current}");

        for label in &labels {
            match StateId::compose(index.successors_of_set(&members, label)) {
                Some(candidate) => {
                    transitions.push(Transition::new(
                        current.clone(),
                        label.clone(),
                        [candidate.clone()],
                    ));
                    if seen.insert(candidate.clone()) {
                        trace!("discovered {candidate}");
                        discovered.push(candidate.clone());
                        worklist.push(candidate);
                    }
                }
                None => {
                    if seen.insert(StateId::Trap) {
                        trace!("{current} is stuck on {label}, adding trap state");
                        discovered.push(StateId::Trap);
                        transitions.extend(labels.iter().map(|l| {
                            Transition::new(StateId::Trap, l.clone(), [StateId::Trap])
                        }));
                    }
                    transitions.push(Transition::new(
                        current.clone(),
                        label.clone(),
                        [StateId::Trap],
                    ));
                }
            }
        }
    }

    let finals: Vec<StateId> = discovered
        .iter()
        .filter(|q| q.intersects(&nfa.finals))
        .cloned()
        .collect();

    debug!(
        "subset construction {} after {steps} steps with {} states and {} transitions",
        if interrupted { "interrupted" } else { "finished" },
        discovered.len(),
        transitions.len()
    );

    Construction {
        dfa: Automaton::new(
            initial,
            discovered,
            nfa.alphabet.iter().cloned(),
            finals,
            transitions,
        ),
        steps,
        completed: (!interrupted).then_some(steps),
    }
}

impl Automaton {
    /// Returns the complete deterministic automaton obtained through [`generate_dfa`].
    pub fn determinize(&self) -> Automaton {
        generate_dfa(self, StepLimit::Unlimited).into_dfa()
    }
}
