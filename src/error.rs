use thiserror::Error;

use crate::alphabet::Label;

/// Problems with an automaton description that are detected at the input boundary,
/// before any construction runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// No initial state was set.
    #[error("no initial state was given")]
    MissingInitial,

    /// The set of final states is empty.
    #[error("at least one final state is required")]
    NoFinalStates,

    /// The description does not contain a single transition.
    #[error("at least one transition is required")]
    NoTransitions,

    /// A state name is empty or consists of whitespace only.
    #[error("state names may not be empty")]
    EmptyName,

    /// A state name uses one of the characters reserved for composite states.
    #[error("state name \"{name}\" contains the reserved character '{character}'")]
    ReservedCharacter {
        /// The offending name.
        name: String,
        /// The reserved character it contains.
        character: char,
    },

    /// A transition was given without any target state.
    #[error("transition from \"{state}\" on {label} has no target states")]
    EmptyTargets {
        /// Origin of the transition.
        state: String,
        /// Label of the transition.
        label: Label,
    },
}

/// Errors that can occur when parsing a state identifier from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateParseError {
    /// The text is empty or the brackets enclose an empty member.
    #[error("state identifier \"{0}\" is empty or names an empty set")]
    Empty(String),

    /// Only one of the two brackets is present.
    #[error("state identifier \"{0}\" has unbalanced brackets")]
    Unbalanced(String),

    /// A member contains a reserved character.
    #[error("state identifier \"{0}\" contains the reserved character '{1}'")]
    Reserved(String, char),
}
