//! Library for turning nondeterministic finite automata into minimal deterministic ones.
//!
//! An [`Automaton`] consists of an initial state, a set of final states, an ordered list of states,
//! an alphabet of textual symbols and an ordered sequence of transitions. Each transition leads from one
//! state on a symbol (or on epsilon, written `λ` or as the empty string) to a set of target states. Such an
//! automaton may be nondeterministic, in which case the construction pipeline turns it into a DFA:
//! - [`closure::eliminate_epsilon`] removes epsilon transitions, based on the epsilon closures of states.
//! - [`subset::generate_dfa`] performs the subset construction. States of the resulting DFA are composite
//!   states, which stand for sets of states of the original automaton. Whenever a state has no successor on
//!   some symbol, a transition into the synthesized trap state is added, so the result is complete. The
//!   construction can be interrupted after a number of steps, which is used for replaying it step by step.
//! - [`minimization::Minimizer`] merges states that behave the same, it never removes the initial state
//!   or the trap state.
//!
//! States are identified by [`StateId`], which distinguishes simple, composite and trap states structurally,
//! so a composite state can never be confused with a user state that happens to contain commas. Composite
//! states are displayed as `{A,B}` with their members sorted.
//!
//! Results can be inspected as a [`table::TransitionTable`] or exported to the DOT format through
//! [`dot::Dottable`]. The [`pipeline::Pipeline`] bundles all stages and the configuration of a run.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use determinize::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{Label, Symbol, EPSILON},
        automaton::{
            successors, Automaton, AutomatonBuilder, Targets, Transition, TransitionIndex,
        },
        closure::{eliminate_epsilon, epsilon_closure, ClosureEngine},
        dot::Dottable,
        error::{BuildError, StateParseError},
        math,
        minimization::{minimize_dfa, Merge, MinimizationStrategy, Minimizer},
        pipeline::{Frame, Pipeline, PipelineOutput, Replay},
        state::StateId,
        subset::{generate_dfa, Construction, StepLimit},
        table::TransitionTable,
        Show,
    };
}

/// Definitions of mathematical helpers, such as sets, maps and partitions.
pub mod math;

/// Symbols and transition labels.
pub mod alphabet;

/// Identifiers of (composite) states.
pub mod state;
pub use state::StateId;

/// Defines automata, their transitions and the transition index.
pub mod automaton;
pub use automaton::Automaton;

/// Errors that occur at the input boundary.
pub mod error;

pub mod closure;

pub mod subset;

/// Merging of equivalent states of deterministic automata.
pub mod minimization;

/// Configuration of the whole construction and its stepwise replay.
pub mod pipeline;

/// Tabular view of the transition function.
pub mod table;

/// Export to the DOT format of graphviz.
pub mod dot;

/// Implements the generation of random automata. This is feature gated behind the `random` feature.
#[cfg(feature = "random")]
pub mod random;

use itertools::Itertools;

/// Helper trait which can be used to display states, transitions and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state that should be
    /// for example `q0` or `{q0,q1}` and for a transition `(q0, a, {q1})`.
    /// This is mainly used for debugging and logging purposes.
    fn show(&self) -> String;
    /// Show a collection of the thing, for a collection of states this should be {q0, q1, q2, ...}
    /// and for a collection of transitions it should be {(q0, a, q1), (q1, b, q2), ...}.
    /// By default, the elements are shown one after the other, enclosed in square brackets.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
        I::IntoIter: DoubleEndedIterator,
    {
        format!("[{}]", iter.into_iter().map(|x| x.show()).join(", "))
    }
}

impl<S: Show> Show for Option<S> {
    fn show(&self) -> String {
        match self {
            None => "-".to_string(),
            Some(x) => x.show(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn show_helpers() {
        let states = [StateId::from("A"), StateId::Trap];
        assert_eq!(StateId::show_collection(states.iter()), "{A, ∅}");
        assert_eq!(Symbol::show_collection([Symbol::from("a")].iter()), "[a]");
        assert_eq!(Some(StateId::from("A")).show(), "A");
        assert_eq!(None::<StateId>.show(), "-");
    }
}
