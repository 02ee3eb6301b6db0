use std::collections::BTreeSet;

use crate::{math::Map, prelude::*};

/// Returns the union of the targets of every transition in `transitions` that leaves
/// `state` on `label`. Every state appears at most once, in the order in which it is
/// first encountered.
pub fn successors<'a, I>(state: &StateId, label: &Label, transitions: I) -> Vec<StateId>
where
    I: IntoIterator<Item = &'a Transition>,
{
    let mut out: Vec<StateId> = vec![];
    for t in transitions
        .into_iter()
        .filter(|t| &t.source == state && &t.label == label)
    {
        for target in &t.targets {
            if !out.contains(target) {
                out.push(target.clone());
            }
        }
    }
    out
}

/// Precomputed transition function of an automaton, maps every state and label to the
/// states that can be reached. Built once and queried repeatedly.
#[derive(Debug, Clone, Default)]
pub struct TransitionIndex {
    edges: Map<StateId, Map<Label, Vec<StateId>>>,
}

impl TransitionIndex {
    /// Builds the index from a sequence of transitions. Targets of transitions that share
    /// source and label are unioned, keeping the order of first occurrence.
    pub fn new<'a, I: IntoIterator<Item = &'a Transition>>(transitions: I) -> Self {
        let mut edges: Map<StateId, Map<Label, Vec<StateId>>> = Map::default();
        for t in transitions {
            let entry = edges
                .entry(t.source.clone())
                .or_default()
                .entry(t.label.clone())
                .or_default();
            for target in &t.targets {
                if !entry.contains(target) {
                    entry.push(target.clone());
                }
            }
        }
        Self { edges }
    }

    /// The successors of `state` on `label`, empty if there are none.
    pub fn successors(&self, state: &StateId, label: &Label) -> &[StateId] {
        self.edges
            .get(state)
            .and_then(|by_label| by_label.get(label))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The union of the successors of all states in `states` on `label`.
    pub fn successors_of_set<'a, I>(&self, states: I, label: &Label) -> BTreeSet<StateId>
    where
        I: IntoIterator<Item = &'a StateId>,
    {
        states
            .into_iter()
            .flat_map(|q| self.successors(q, label))
            .cloned()
            .collect()
    }
}
