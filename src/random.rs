use std::collections::BTreeSet;

use tracing::trace;

use crate::prelude::*;

/// Parameters for [`random_nfa`].
#[derive(Debug, Clone, PartialEq)]
pub struct RandomNfa {
    /// Number of states, named `q0`, `q1`, ...
    pub states: usize,
    /// Number of symbols, named `a`, `b`, ...
    pub symbols: usize,
    /// Probability that a given state has a transition to a given target on a given symbol.
    pub density: f64,
    /// Probability that a given state has an epsilon transition to a given target.
    pub epsilon: f64,
    /// Probability that a state is final.
    pub accepting: f64,
}

impl Default for RandomNfa {
    fn default() -> Self {
        Self {
            states: 5,
            symbols: 2,
            density: 0.25,
            epsilon: 0.1,
            accepting: 0.3,
        }
    }
}

/// Draws a random automaton according to `params`, using `rng` so that the result can be
/// reproduced by seeding it. State `q0` is initial, and at least one state is final.
pub fn random_nfa(rng: &mut fastrand::Rng, params: &RandomNfa) -> Automaton {
    let states: Vec<StateId> = (0..params.states.max(1))
        .map(|i| StateId::simple(format!("q{i}")))
        .collect();
    let alphabet: Vec<Symbol> = ('a'..='z')
        .take(params.symbols.clamp(1, 26))
        .map(Symbol::from)
        .collect();

    let mut transitions = vec![];
    for source in &states {
        for sym in &alphabet {
            let targets: Vec<StateId> = states
                .iter()
                .filter(|_| rng.f64() < params.density)
                .cloned()
                .collect();
            if !targets.is_empty() {
                transitions.push(Transition::new(source.clone(), sym.clone(), targets));
            }
        }
        let targets: Vec<StateId> = states
            .iter()
            .filter(|q| *q != source && rng.f64() < params.epsilon)
            .cloned()
            .collect();
        if !targets.is_empty() {
            transitions.push(Transition::new(source.clone(), Label::Epsilon, targets));
        }
    }

    let mut finals: BTreeSet<StateId> = states
        .iter()
        .filter(|_| rng.f64() < params.accepting)
        .cloned()
        .collect();
    if finals.is_empty() {
        finals.insert(states[rng.usize(..states.len())].clone());
    }

    trace!(
        "drew random automaton with {} states and {} transitions",
        states.len(),
        transitions.len()
    );
    Automaton::new(states[0].clone(), states, alphabet, finals, transitions)
}

/// Draws `count` random words over `alphabet` whose length is at most `max_length`.
pub fn random_words(
    rng: &mut fastrand::Rng,
    alphabet: &BTreeSet<Symbol>,
    count: usize,
    max_length: usize,
) -> Vec<Vec<Symbol>> {
    let symbols: Vec<&Symbol> = alphabet.iter().collect();
    if symbols.is_empty() {
        return vec![vec![]; count];
    }
    (0..count)
        .map(|_| {
            let length = rng.usize(..=max_length);
            (0..length)
                .map(|_| symbols[rng.usize(..symbols.len())].clone())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_generation_is_reproducible() {
        let params = RandomNfa {
            states: 8,
            symbols: 3,
            ..Default::default()
        };
        let first = random_nfa(&mut fastrand::Rng::with_seed(42), &params);
        let second = random_nfa(&mut fastrand::Rng::with_seed(42), &params);
        assert_eq!(first, second);
        assert_eq!(first.size(), 8);
        assert_eq!(first.alphabet().len(), 3);
        assert!(!first.finals().is_empty());

        let words = random_words(&mut fastrand::Rng::with_seed(1), first.alphabet(), 10, 4);
        assert_eq!(words.len(), 10);
        assert!(words.iter().all(|w| w.len() <= 4));
    }
}
