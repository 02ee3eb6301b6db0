use bit_set::BitSet;
use tracing::{debug, trace};

use crate::{
    math::{Bijection, Map, Partition},
    prelude::*,
};

/// Determines how equivalent states of a DFA are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MinimizationStrategy {
    /// A single scan over all pairs of states. Two states are merged if they agree on
    /// acceptance and have literally the same successors on every symbol. Merges are applied
    /// as soon as they are found, so later pairs see the rewritten transitions, but pairs
    /// that were already compared are not revisited.
    #[default]
    SinglePass,
    /// Repeats [`MinimizationStrategy::SinglePass`] until a scan merges nothing.
    Fixpoint,
    /// Moore's partition refinement. Computes the coarsest partition of the states that is
    /// compatible with acceptance and the transitions and merges every class into one state,
    /// which yields the minimal DFA (up to the protected trap state).
    PartitionRefinement,
}

/// Records that `removed` was merged into `kept`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Merge {
    /// The state that no longer exists.
    pub removed: StateId,
    /// The state that took over the incoming transitions of `removed`.
    pub kept: StateId,
}

/// Merges equivalent states of a DFA in place.
///
/// When two states are merged, the initial state is always the one that is kept. The trap
/// state is never removed: a merge that would remove it is skipped.
#[derive(Debug, Clone, Default)]
pub struct Minimizer {
    strategy: MinimizationStrategy,
    merges: Vec<Merge>,
}

impl Minimizer {
    /// Creates a minimizer that uses the given strategy.
    pub fn new(strategy: MinimizationStrategy) -> Self {
        Self {
            strategy,
            merges: vec![],
        }
    }

    /// All merges applied so far, in the order in which they happened.
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Minimizes `dfa` and returns the number of merged states. The transitions of `dfa`
    /// should be in single-successor form, as produced by the subset construction, since
    /// successors are compared as sequences.
    pub fn run(&mut self, dfa: &mut Automaton) -> usize {
        let before = self.merges.len();
        match self.strategy {
            MinimizationStrategy::SinglePass => {
                self.single_pass(dfa);
            }
            MinimizationStrategy::Fixpoint => {
                let mut round = 1;
                while self.single_pass(dfa) > 0 {
                    round += 1;
                    trace!("starting scan {round}");
                }
            }
            MinimizationStrategy::PartitionRefinement => {
                let partition = equivalence_classes(dfa);
                for class in &partition {
                    self.collapse(dfa, class.iter());
                }
            }
        }
        let merged = self.merges.len() - before;
        debug!(
            "minimization ({:?}) merged {merged} states, {} remain",
            self.strategy,
            dfa.size()
        );
        merged
    }

    fn single_pass(&mut self, dfa: &mut Automaton) -> usize {
        let labels: Vec<Label> = dfa.alphabet.iter().map(Label::from).collect();
        let snapshot = dfa.states.clone();
        let mut index = dfa.index();
        let mut merged = 0;

        for (i, p) in snapshot.iter().enumerate() {
            for q in &snapshot[i + 1..] {
                if !dfa.contains_state(p) {
                    break;
                }
                if !dfa.contains_state(q) || dfa.is_final(p) != dfa.is_final(q) {
                    continue;
                }
                if labels
                    .iter()
                    .all(|l| index.successors(p, l) == index.successors(q, l))
                    && self.merge(dfa, p, q)
                {
                    merged += 1;
                    index = dfa.index();
                }
            }
        }
        merged
    }

    /// Merges all states of one equivalence class into a single representative: the initial
    /// state if it belongs to the class, otherwise the trap, otherwise the state that was
    /// added first.
    fn collapse<'a, I: Iterator<Item = &'a StateId>>(&mut self, dfa: &mut Automaton, class: I) {
        let mut members: Vec<StateId> = class.cloned().collect();
        if members.len() < 2 {
            return;
        }
        members.sort_by_key(|q| {
            (
                q != &dfa.initial,
                !q.is_trap(),
                dfa.states.iter().position(|p| p == q),
            )
        });
        let (kept, rest) = members.split_at(1);
        for removed in rest {
            self.merge(dfa, removed, &kept[0]);
        }
    }

    fn merge(&mut self, dfa: &mut Automaton, p: &StateId, q: &StateId) -> bool {
        let (removed, kept) = if p == &dfa.initial { (q, p) } else { (p, q) };
        if removed.is_trap() {
            trace!("{removed} and {kept} are equivalent, but the trap state is kept");
            return false;
        }
        trace!("merging {removed} into {kept}");
        dfa.merge_into(removed, kept);
        self.merges.push(Merge {
            removed: removed.clone(),
            kept: kept.clone(),
        });
        true
    }
}

/// Computes the classes of states of `dfa` that accept the same language, by refining the
/// split into accepting and rejecting states until it is stable.
pub fn equivalence_classes(dfa: &Automaton) -> Partition<StateId> {
    let ids: Bijection<usize, StateId> = dfa.states.iter().cloned().enumerate().collect();
    let accepting: BitSet = dfa
        .states
        .iter()
        .enumerate()
        .filter(|(_, q)| dfa.is_final(q))
        .map(|(i, _)| i)
        .collect();
    let index = dfa.index();
    let labels: Vec<Label> = dfa.alphabet.iter().map(Label::from).collect();

    let n = dfa.states.len();
    let mut class: Vec<usize> = (0..n).map(|i| usize::from(accepting.contains(i))).collect();
    let mut count = if accepting.is_empty() || accepting.len() == n {
        1
    } else {
        2
    };

    loop {
        let mut signatures: Map<(usize, Vec<Vec<usize>>), usize> = Map::default();
        let next: Vec<usize> = dfa
            .states
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let successors: Vec<Vec<usize>> = labels
                    .iter()
                    .map(|l| {
                        index
                            .successors(q, l)
                            .iter()
                            .filter_map(|t| ids.get_by_right(t))
                            .map(|&j| class[j])
                            .collect::<Vec<_>>()
                    })
                    .collect();
                let fresh = signatures.len();
                *signatures.entry((class[i], successors)).or_insert(fresh)
            })
            .collect();
        let refined = signatures.len();
        class = next;
        if refined == count {
            break;
        }
        trace!("refined partition from {count} into {refined} classes");
        count = refined;
    }

    Partition::new((0..count).map(|c| {
        (0..n)
            .filter(|&i| class[i] == c)
            .filter_map(|i| ids.get_by_left(&i).cloned())
            .collect::<Vec<_>>()
    }))
}

/// Minimizes `dfa` with the given strategy and returns it. See [`Minimizer`].
pub fn minimize_dfa(mut dfa: Automaton, strategy: MinimizationStrategy) -> Automaton {
    Minimizer::new(strategy).run(&mut dfa);
    dfa
}

impl Automaton {
    /// Minimizes `self` using the default [`MinimizationStrategy`].
    pub fn minimize(self) -> Automaton {
        minimize_dfa(self, MinimizationStrategy::default())
    }

    /// Minimizes `self` using the given strategy.
    pub fn minimize_with(self, strategy: MinimizationStrategy) -> Automaton {
        minimize_dfa(self, strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(name: &str) -> StateId {
        StateId::from(name)
    }

    fn dfa<const N: usize>(
        states: &[&str],
        finals: &[&str],
        edges: [(&str, &str, &str); N],
    ) -> Automaton {
        let state = |name: &str| {
            if name == "trap" {
                StateId::Trap
            } else {
                q(name)
            }
        };
        let transitions = edges
            .iter()
            .map(|(p, a, r)| Transition::new(state(p), *a, [state(r)]))
            .collect::<Vec<_>>();
        Automaton::new(
            state(states[0]),
            states.iter().map(|s| state(s)),
            transitions
                .iter()
                .filter_map(|t| t.label.symbol().cloned())
                .collect::<Vec<_>>(),
            finals.iter().map(|s| state(s)),
            transitions,
        )
    }

    fn diamond() -> Automaton {
        dfa(
            &["S", "P", "Q", "R"],
            &["R"],
            [
                ("S", "a", "P"),
                ("S", "b", "Q"),
                ("P", "a", "R"),
                ("P", "b", "R"),
                ("Q", "a", "R"),
                ("Q", "b", "R"),
                ("R", "a", "R"),
                ("R", "b", "R"),
            ],
        )
    }

    fn chain() -> Automaton {
        dfa(
            &["S", "A", "B", "P", "Q", "F"],
            &["F"],
            [
                ("S", "a", "A"),
                ("S", "b", "B"),
                ("A", "a", "P"),
                ("A", "b", "P"),
                ("B", "a", "Q"),
                ("B", "b", "Q"),
                ("P", "a", "F"),
                ("P", "b", "F"),
                ("Q", "a", "F"),
                ("Q", "b", "F"),
                ("F", "a", "F"),
                ("F", "b", "F"),
            ],
        )
    }

    #[test_log::test]
    fn identical_states_collapse() {
        let mut automaton = diamond();
        let mut minimizer = Minimizer::new(MinimizationStrategy::SinglePass);
        assert_eq!(minimizer.run(&mut automaton), 1);
        assert_eq!(
            minimizer.merges(),
            &[Merge {
                removed: q("P"),
                kept: q("Q")
            }]
        );
        assert_eq!(automaton.size(), 3);
        assert_eq!(automaton.successors(&q("S"), "a"), vec![q("Q")]);
        assert_eq!(automaton.successors(&q("S"), "b"), vec![q("Q")]);
        assert!(automaton.transitions().iter().all(|t| t.source != q("P")
            && !t.targets.contains(&q("P"))));
        assert!(automaton.is_complete());
    }

    #[test_log::test]
    fn initial_state_is_kept() {
        let automaton = dfa(
            &["S", "X", "Y"],
            &["Y"],
            [
                ("S", "a", "Y"),
                ("X", "a", "Y"),
                ("Y", "a", "S"),
            ],
        )
        .minimize();
        assert_eq!(automaton.states(), &[q("S"), q("Y")]);
        assert_eq!(automaton.initial(), &q("S"));
    }

    #[test_log::test]
    fn trap_state_is_protected() {
        for strategy in [
            MinimizationStrategy::SinglePass,
            MinimizationStrategy::Fixpoint,
            MinimizationStrategy::PartitionRefinement,
        ] {
            let automaton = dfa(
                &["S", "trap", "Z"],
                &["S"],
                [
                    ("S", "a", "Z"),
                    ("trap", "a", "trap"),
                    ("Z", "a", "trap"),
                ],
            )
            .minimize_with(strategy);
            assert!(automaton.contains_state(&StateId::Trap));
            assert!(automaton.contains_state(&q("S")));
        }
    }

    #[test_log::test]
    fn equivalent_state_merges_into_trap() {
        let automaton = dfa(
            &["S", "Z", "trap"],
            &["S"],
            [
                ("S", "a", "Z"),
                ("Z", "a", "trap"),
                ("trap", "a", "trap"),
            ],
        )
        .minimize();
        assert_eq!(automaton.states(), &[q("S"), StateId::Trap]);
        assert_eq!(automaton.successors(&q("S"), "a"), vec![StateId::Trap]);
    }

    #[test_log::test]
    fn fixpoint_finds_late_merges() {
        let single = chain().minimize_with(MinimizationStrategy::SinglePass);
        assert_eq!(single.size(), 5);

        let fixpoint = chain().minimize_with(MinimizationStrategy::Fixpoint);
        assert_eq!(fixpoint.size(), 4);
        assert_eq!(fixpoint.successors(&q("S"), "a"), vec![q("B")]);

        let refined = chain().minimize_with(MinimizationStrategy::PartitionRefinement);
        assert_eq!(refined.size(), 4);
    }

    #[test_log::test]
    fn partition_refinement_merges_cycles() {
        let cyclic = || {
            dfa(
                &["S", "X", "F"],
                &["F"],
                [
                    ("S", "a", "X"),
                    ("X", "a", "S"),
                    ("S", "b", "F"),
                    ("X", "b", "F"),
                    ("F", "a", "F"),
                    ("F", "b", "F"),
                ],
            )
        };
        assert_eq!(
            equivalence_classes(&cyclic()),
            Partition::new([vec![q("S"), q("X")], vec![q("F")]])
        );
        assert_eq!(cyclic().minimize().size(), 3);

        let minimal = cyclic().minimize_with(MinimizationStrategy::PartitionRefinement);
        assert_eq!(minimal.size(), 2);
        assert_eq!(minimal.successors(&q("S"), "a"), vec![q("S")]);
        for word in [vec!["b"], vec!["a", "b"], vec!["a", "a"], vec!["a", "b", "a"]] {
            assert_eq!(cyclic().accepts(word.clone()), minimal.accepts(word));
        }
    }

    #[test_log::test]
    fn minimizing_the_subset_construction() {
        let dfa = crate::subset::tests::abc_nfa().determinize();
        let minimal = dfa.clone().minimize_with(MinimizationStrategy::PartitionRefinement);
        assert_eq!(minimal.size(), dfa.size());
        assert_eq!(dfa.clone().minimize(), dfa);
    }

    #[cfg(feature = "random")]
    #[test_log::test]
    fn minimization_keeps_language() {
        use crate::random::{random_nfa, random_words, RandomNfa};

        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..25 {
            let nfa = random_nfa(&mut rng, &RandomNfa::default());
            let dfa = nfa.determinize();
            let single = dfa.clone().minimize_with(MinimizationStrategy::SinglePass);
            let fixpoint = dfa.clone().minimize_with(MinimizationStrategy::Fixpoint);
            let refined = dfa
                .clone()
                .minimize_with(MinimizationStrategy::PartitionRefinement);

            assert!(refined.size() <= fixpoint.size());
            assert!(fixpoint.size() <= single.size());
            for minimal in [&single, &fixpoint, &refined] {
                assert_eq!(minimal.initial(), dfa.initial());
                assert_eq!(
                    minimal.contains_state(&StateId::Trap),
                    dfa.contains_state(&StateId::Trap)
                );
                assert!(minimal.is_complete());
            }
            for word in random_words(&mut rng, nfa.alphabet(), 30, 6) {
                let expected = nfa.accepts(word.clone());
                assert_eq!(single.accepts(word.clone()), expected);
                assert_eq!(fixpoint.accepts(word.clone()), expected);
                assert_eq!(refined.accepts(word), expected);
            }
        }
    }
}
