use tracing::debug;

use crate::prelude::*;

/// Configuration of a complete run from a (nondeterministic) automaton to a minimal DFA.
///
/// # Example
/// ```
/// use determinize::prelude::*;
///
/// let nfa = Automaton::builder()
///     .initial("A")
///     .with_finals(["B"])
///     .with_transition("A", "a", ["A", "B"])
///     .build()
///     .unwrap();
/// let output = Pipeline::default()
///     .with_strategy(MinimizationStrategy::PartitionRefinement)
///     .run(&nfa);
/// assert!(output.result().is_complete());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pipeline {
    step_limit: StepLimit,
    strategy: MinimizationStrategy,
    minimize: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            step_limit: StepLimit::Unlimited,
            strategy: MinimizationStrategy::default(),
            minimize: true,
        }
    }
}

/// Everything a [`Pipeline`] run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The input without epsilon transitions.
    pub epsilon_free: Automaton,
    /// The result of the subset construction.
    pub construction: Construction,
    /// The minimized DFA, present if minimization is enabled and the construction ran
    /// to completion.
    pub minimized: Option<Automaton>,
    /// The merges the minimizer applied.
    pub merges: Vec<Merge>,
}

impl PipelineOutput {
    /// The most processed automaton: the minimized DFA if there is one, otherwise the
    /// (possibly partial) result of the subset construction.
    pub fn result(&self) -> &Automaton {
        self.minimized
            .as_ref()
            .unwrap_or_else(|| self.construction.dfa())
    }
}

impl Pipeline {
    /// Limits the number of steps of the subset construction.
    pub fn with_step_limit(mut self, step_limit: StepLimit) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Sets the strategy used for minimization.
    pub fn with_strategy(mut self, strategy: MinimizationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Stops after the subset construction.
    pub fn without_minimization(mut self) -> Self {
        self.minimize = false;
        self
    }

    /// The configured step limit.
    pub fn step_limit(&self) -> StepLimit {
        self.step_limit
    }

    /// The configured minimization strategy.
    pub fn strategy(&self) -> MinimizationStrategy {
        self.strategy
    }

    /// Runs all stages on `nfa`.
    pub fn run(&self, nfa: &Automaton) -> PipelineOutput {
        let epsilon_free = eliminate_epsilon(nfa.clone());
        let construction = generate_dfa(&epsilon_free, self.step_limit);

        let mut merges = vec![];
        let minimized = if self.minimize && !construction.is_interrupted() {
            let mut minimizer = Minimizer::new(self.strategy);
            let mut dfa = construction.dfa().clone();
            minimizer.run(&mut dfa);
            merges = minimizer.merges().to_vec();
            Some(dfa)
        } else {
            None
        };

        PipelineOutput {
            epsilon_free,
            construction,
            minimized,
            merges,
        }
    }

    /// Prepares a stepwise replay of the construction of `nfa`. The replay uses the configured
    /// strategy, and the configured step limit caps the number of frames.
    pub fn replay<'a>(&self, nfa: &'a Automaton) -> Replay<'a> {
        Replay::new(nfa, self.strategy).with_step_limit(self.step_limit)
    }
}

/// A single frame of a [`Replay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// An intermediate state of the subset construction.
    Partial(Construction),
    /// The fully constructed and minimized DFA.
    Minimized(Automaton),
}

impl Frame {
    /// The automaton shown in this frame.
    pub fn automaton(&self) -> &Automaton {
        match self {
            Frame::Partial(construction) => construction.dfa(),
            Frame::Minimized(dfa) => dfa,
        }
    }

    /// Returns true for the last frame, which shows the minimized DFA.
    pub fn is_minimized(&self) -> bool {
        matches!(self, Frame::Minimized(_))
    }
}

/// Replays the subset construction of an automaton step by step. Creating a replay runs one
/// complete construction to learn how many steps it takes; frames `1..=completed` show the
/// construction interrupted at that step and frame `completed + 1` shows the minimized DFA.
/// With a [`StepLimit::After`] limit, only the frames up to that limit are produced.
#[derive(Debug, Clone)]
pub struct Replay<'a> {
    nfa: &'a Automaton,
    strategy: MinimizationStrategy,
    limit: StepLimit,
    completed: usize,
    complete: Automaton,
}

impl<'a> Replay<'a> {
    /// Runs a complete construction of `nfa` and prepares the replay.
    pub fn new(nfa: &'a Automaton, strategy: MinimizationStrategy) -> Self {
        let construction = generate_dfa(nfa, StepLimit::Unlimited);
        let completed = construction.completed_steps().unwrap_or(construction.steps());
        debug!("construction takes {completed} steps");
        Self {
            nfa,
            strategy,
            limit: StepLimit::Unlimited,
            completed,
            complete: construction.into_dfa(),
        }
    }

    /// Caps the frames produced by [`Replay::frames`] at `limit`.
    pub fn with_step_limit(mut self, limit: StepLimit) -> Self {
        self.limit = limit;
        self
    }

    /// The number of steps of the complete construction.
    pub fn completed_steps(&self) -> usize {
        self.completed
    }

    /// The number of frames. Without a limit this is one more than the number of steps,
    /// a limit of `n` leaves at most `n` frames (but always at least one).
    pub fn frame_count(&self) -> usize {
        match self.limit {
            StepLimit::Unlimited => self.completed + 1,
            StepLimit::After(n) => (self.completed + 1).min(n.max(1)),
        }
    }

    /// Returns the frame for the given step limit. Limits beyond the last step yield the
    /// minimized DFA.
    pub fn frame(&self, limit: usize) -> Frame {
        if limit > self.completed {
            Frame::Minimized(minimize_dfa(self.complete.clone(), self.strategy))
        } else {
            Frame::Partial(generate_dfa(self.nfa, StepLimit::After(limit)))
        }
    }

    /// Iterates over all frames in order.
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        (1..=self.frame_count()).map(|limit| self.frame(limit))
    }
}
