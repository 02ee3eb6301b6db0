use std::fmt::{Debug, Display};

use crate::Show;

/// The reserved glyph that denotes an epsilon (also called lambda) transition.
pub const EPSILON: &str = "λ";

/// A single input symbol. Symbols are textual, so multi-character symbols such as `"ab"`
/// are allowed, but the empty string and [`EPSILON`] are reserved for epsilon transitions
/// and never end up in an alphabet.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from anything that can be turned into a [`String`].
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    /// Returns the textual representation of the symbol.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the given raw text denotes an epsilon transition.
    pub fn is_epsilon_text(raw: &str) -> bool {
        raw.is_empty() || raw == EPSILON
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<char> for Symbol {
    fn from(value: char) -> Self {
        Self(value.to_string())
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Show for Symbol {
    fn show(&self) -> String {
        self.0.clone()
    }
}

/// The label of a transition, which is either a proper alphabet symbol or epsilon.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    /// An epsilon transition, it can be taken without reading input.
    Epsilon,
    /// A transition that consumes the given symbol.
    Symbol(Symbol),
}

impl Label {
    /// Parses a raw label. The empty string and [`EPSILON`] are mapped to [`Label::Epsilon`],
    /// everything else is a [`Label::Symbol`].
    pub fn parse(raw: &str) -> Self {
        if Symbol::is_epsilon_text(raw) {
            Label::Epsilon
        } else {
            Label::Symbol(Symbol::new(raw))
        }
    }

    /// Returns true if and only if `self` is [`Label::Epsilon`].
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    /// Returns the symbol that is consumed, or `None` for epsilon.
    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            Label::Epsilon => None,
            Label::Symbol(sym) => Some(sym),
        }
    }
}

impl From<Symbol> for Label {
    fn from(value: Symbol) -> Self {
        Label::Symbol(value)
    }
}

impl From<&Symbol> for Label {
    fn from(value: &Symbol) -> Self {
        Label::Symbol(value.clone())
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::parse(value)
    }
}

impl From<char> for Label {
    fn from(value: char) -> Self {
        Label::parse(&value.to_string())
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Epsilon => write!(f, "{EPSILON}"),
            Label::Symbol(sym) => write!(f, "{sym}"),
        }
    }
}

impl Debug for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl Show for Label {
    fn show(&self) -> String {
        self.to_string()
    }
}
