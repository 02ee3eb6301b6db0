//! Identifiers of states. A state is either a simple state given by the user, a composite
//! state that stands for a set of states (as produced by the subset construction) or the
//! synthesized trap state.
//!
//! Composite states are written with a reserved bracket convention, the set `{B, A}` is
//! displayed as `{A,B}`. Members are always kept sorted and deduplicated, so two
//! constructions of the same set compare (and hash) equal. Members are never flattened:
//! determinizing an automaton whose states are already composite yields states such as
//! `{{A,B},C}`, because `{A,B}` is a single state of that automaton.
use std::{
    collections::BTreeSet,
    fmt::{Debug, Display},
};

use itertools::Itertools;

use crate::{error::StateParseError, Show};

/// Opening bracket of a composite state.
pub const OPEN: char = '{';
/// Closing bracket of a composite state.
pub const CLOSE: char = '}';
/// Separator between the members of a composite state.
pub const SEPARATOR: char = ',';
/// The reserved literal under which the trap state is displayed.
pub const TRAP: &str = "∅";

/// Characters that may not appear in the name of a simple state.
pub const RESERVED: [char; 3] = [OPEN, CLOSE, SEPARATOR];

/// Identifies a state of an automaton.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateId {
    /// A state with the given name.
    Simple(String),
    /// A state that represents a set of states. The set has at least two members, or
    /// exactly one member that is not simple.
    Composite(BTreeSet<StateId>),
    /// The synthesized non-accepting sink.
    Trap,
}

impl StateId {
    /// Creates a simple state with the given name.
    pub fn simple<S: Into<String>>(name: S) -> Self {
        StateId::Simple(name.into())
    }

    /// Returns true iff `self` uses the composite bracket convention.
    pub fn is_composite(&self) -> bool {
        matches!(self, StateId::Composite(_))
    }

    /// Returns true iff `self` is the trap state.
    pub fn is_trap(&self) -> bool {
        matches!(self, StateId::Trap)
    }

    /// Splits `self` into the states it stands for, in order. For a simple state (or the trap)
    /// this is a sequence containing only `self`. This is the inverse of [`StateId::compose`].
    pub fn decompose(&self) -> Vec<StateId> {
        match self {
            StateId::Composite(members) => members.iter().cloned().collect(),
            other => vec![other.clone()],
        }
    }

    /// Composes a collection of states into one identifier. The members are sorted and
    /// deduplicated. If exactly one simple state remains, it is returned unchanged. Returns
    /// `None` if the collection is empty, which callers must treat as "no transition".
    ///
    /// Composite inputs are kept as members and not merged into the result. A lone member that
    /// is composite (or the trap) is wrapped into a one-element set, so that `decompose` gives
    /// back exactly the states that were composed.
    pub fn compose<I: IntoIterator<Item = StateId>>(ids: I) -> Option<StateId> {
        let mut members: BTreeSet<StateId> = ids.into_iter().collect();
        match members.len() {
            0 => None,
            1 => members.pop_first().map(StateId::singleton),
            _ => Some(StateId::Composite(members)),
        }
    }

    /// The identifier of the set that only contains `state`.
    pub fn singleton(state: StateId) -> StateId {
        match state {
            StateId::Simple(_) => state,
            other => StateId::Composite(BTreeSet::from([other])),
        }
    }

    /// Returns true if one of the states that `self` stands for is in `states`.
    pub fn intersects<'a, I>(&self, states: I) -> bool
    where
        I: IntoIterator<Item = &'a StateId>,
    {
        let members = self.decompose();
        states.into_iter().any(|q| members.contains(q))
    }

    /// Parses an identifier. Text of the form `{A,B}` becomes a composite state (or a simple
    /// one if it names only one member), the reserved trap literal becomes [`StateId::Trap`]
    /// and anything else is a simple state.
    pub fn parse(raw: &str) -> Result<StateId, StateParseError> {
        let trimmed = raw.trim();
        if trimmed == TRAP {
            return Ok(StateId::Trap);
        }
        match (trimmed.starts_with(OPEN), trimmed.ends_with(CLOSE)) {
            (true, true) if trimmed.len() >= 2 => {
                let inner = &trimmed[OPEN.len_utf8()..trimmed.len() - CLOSE.len_utf8()];
                let mut members = vec![];
                for part in inner.split(SEPARATOR).map(str::trim) {
                    if part.is_empty() {
                        return Err(StateParseError::Empty(raw.to_string()));
                    }
                    if let Some(c) = part.chars().find(|c| RESERVED.contains(c)) {
                        return Err(StateParseError::Reserved(raw.to_string(), c));
                    }
                    members.push(StateId::simple(part));
                }
                StateId::compose(members).ok_or_else(|| StateParseError::Empty(raw.to_string()))
            }
            (false, false) => {
                if trimmed.is_empty() {
                    return Err(StateParseError::Empty(raw.to_string()));
                }
                match trimmed.chars().find(|c| RESERVED.contains(c)) {
                    Some(c) => Err(StateParseError::Reserved(raw.to_string(), c)),
                    None => Ok(StateId::simple(trimmed)),
                }
            }
            _ => Err(StateParseError::Unbalanced(raw.to_string())),
        }
    }

    /// Returns the name of `self` as it is shown in a graph: brackets are stripped and the
    /// separators between members are removed. Different states may share a flat name.
    pub fn flat_name(&self) -> String {
        match self {
            StateId::Simple(name) => name.clone(),
            StateId::Composite(members) => members.iter().map(StateId::flat_name).join(""),
            StateId::Trap => TRAP.to_string(),
        }
    }
}

impl From<&str> for StateId {
    fn from(value: &str) -> Self {
        StateId::simple(value)
    }
}

impl From<String> for StateId {
    fn from(value: String) -> Self {
        StateId::Simple(value)
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateId::Simple(name) => write!(f, "{name}"),
            StateId::Composite(members) => {
                write!(f, "{OPEN}{}{CLOSE}", members.iter().join(&SEPARATOR.to_string()))
            }
            StateId::Trap => write!(f, "{TRAP}"),
        }
    }
}

impl Debug for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl Show for StateId {
    fn show(&self) -> String {
        self.to_string()
    }

    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
        I::IntoIter: DoubleEndedIterator,
    {
        format!("{{{}}}", iter.into_iter().map(|q| q.show()).join(", "))
    }
}
