use std::fmt::Display;

use itertools::Itertools;

use crate::prelude::*;

/// Turns a state into a quoted DOT identifier. The identifier keeps the brackets of composite
/// states, so that two distinct states never end up as the same node. The shortened name
/// without brackets is only used as the label of the node.
fn sanitize_dot_ident(state: &StateId) -> String {
    format!("\"{}\"", state.to_string().replace('"', "\\\""))
}

/// Passes `dot` to the `dot` executable through a temporary file, with `-Tpng` and the given
/// additional arguments, and returns what it writes to stdout.
#[cfg(feature = "graphviz")]
fn run_dot<I, S>(dot: &str, args: I) -> Result<Vec<u8>, std::io::Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    use std::io::Write;

    let mut input = tempfile::NamedTempFile::new()?;
    input.write_all(dot.as_bytes())?;
    input.flush()?;

    let output = std::process::Command::new("dot")
        .arg("-Tpng")
        .args(args)
        .arg(input.path())
        .output()?;
    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(std::io::Error::other(format!(
            "dot exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }
}

/// Objects that can be exported to the DOT format, which is understood by graphviz and
/// other graph layout tools. The same object always yields the same text: states appear in
/// their stored order, followed by the transitions in their stored order.
pub trait Dottable {
    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    fn dot_representation(&self) -> String {
        let header = std::iter::once(format!("digraph {} {{", self.dot_name()))
            .chain(self.dot_header_statements());

        let states = self.dot_states().into_iter().map(|q| {
            format!(
                "{} [{}]",
                sanitize_dot_ident(&q),
                self.dot_state_attributes(&q)
                    .into_iter()
                    .map(|attr| attr.to_string())
                    .join(", ")
            )
        });

        let transitions = self.dot_transitions().into_iter().map(|(from, to, attrs)| {
            format!(
                "{} -> {} [{}]",
                sanitize_dot_ident(&from),
                sanitize_dot_ident(&to),
                attrs.into_iter().map(|attr| attr.to_string()).join(", ")
            )
        });

        let mut lines = header
            .chain(states)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()));
        lines.join("\n")
    }

    /// Name of the graph.
    fn dot_name(&self) -> String;

    /// Statements that follow the opening line, such as layout settings.
    fn dot_header_statements(&self) -> Vec<String> {
        vec![]
    }

    /// The states that become nodes.
    fn dot_states(&self) -> Vec<StateId>;

    /// Attributes of the node for the given state.
    fn dot_state_attributes(&self, _state: &StateId) -> Vec<DotStateAttribute> {
        vec![]
    }

    /// All edges as triples of origin, target and attributes.
    fn dot_transitions(&self) -> Vec<(StateId, StateId, Vec<DotTransitionAttribute>)>;

    /// Renders the object as PNG and returns the encoded image. Requires the `dot`
    /// executable and the `graphviz` feature.
    #[cfg(feature = "graphviz")]
    fn render(&self) -> Result<Vec<u8>, std::io::Error> {
        let dot = self.dot_representation();
        tracing::trace!("rendering {} to png\n{dot}", self.dot_name());
        run_dot(&dot, std::iter::empty::<&str>())
    }

    /// Renders the object as PNG into the file `filename`. Requires the `dot` executable and
    /// the `graphviz` feature.
    #[cfg(feature = "graphviz")]
    fn render_to_file_name(&self, filename: &str) -> Result<(), std::io::Error> {
        let dot = self.dot_representation();
        tracing::trace!("rendering {} to {filename}", self.dot_name());
        run_dot(&dot, ["-o", filename]).map(|_| ())
    }
}

impl Dottable for Automaton {
    fn dot_name(&self) -> String {
        if self.is_deterministic() {
            "DFA".into()
        } else {
            "NFA".into()
        }
    }

    fn dot_header_statements(&self) -> Vec<String> {
        vec![
            "rankdir=LR".to_string(),
            "init [label=\"\", shape=none]".to_string(),
            format!("init -> {}", sanitize_dot_ident(self.initial())),
        ]
    }

    fn dot_states(&self) -> Vec<StateId> {
        self.states().to_vec()
    }

    fn dot_state_attributes(&self, state: &StateId) -> Vec<DotStateAttribute> {
        let shape = if self.is_final(state) {
            "doublecircle"
        } else {
            "circle"
        };
        vec![
            DotStateAttribute::Shape(shape.into()),
            DotStateAttribute::Label(state.flat_name()),
        ]
    }

    fn dot_transitions(&self) -> Vec<(StateId, StateId, Vec<DotTransitionAttribute>)> {
        self.transitions()
            .iter()
            .flat_map(|t| {
                t.targets.iter().map(move |target| {
                    (
                        t.source.clone(),
                        target.clone(),
                        vec![DotTransitionAttribute::Label(t.label.show())],
                    )
                })
            })
            .collect()
    }
}

/// Enum that abstracts attributes of nodes in the DOT format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotStateAttribute {
    /// The label of a node
    Label(String),
    /// The shape of a node
    Shape(String),
}

impl Display for DotStateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotStateAttribute::Label(s) => write!(f, "label=\"{s}\""),
            DotStateAttribute::Shape(s) => write!(f, "shape=\"{s}\""),
        }
    }
}

/// Attributes of edges in the DOT format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotTransitionAttribute {
    /// The label of an edge
    Label(String),
}

impl Display for DotTransitionAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotTransitionAttribute::Label(lbl) => write!(f, "label=\"{lbl}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn dot_of_dfa() {
        let dfa = crate::subset::tests::abc_nfa().determinize();
        let dot = dfa.dot_representation();
        let lines: Vec<&str> = dot.lines().collect();

        assert_eq!(lines[0], "digraph DFA {");
        assert!(lines.contains(&"init [label=\"\", shape=none]"));
        assert!(lines.contains(&"init -> \"A\""));
        assert!(lines.contains(&"\"{A,C}\" [shape=\"doublecircle\", label=\"AC\"]"));
        assert!(lines.contains(&"\"{A,B}\" [shape=\"circle\", label=\"AB\"]"));
        assert!(lines.contains(&"\"A\" -> \"{A,B}\" [label=\"0\"]"));
        assert_eq!(lines.last(), Some(&"}"));
        assert_eq!(
            lines.iter().filter(|l| l.contains(" -> ")).count(),
            dfa.transitions().len() + 1
        );
        assert_eq!(dot, dfa.clone().dot_representation());
    }

    #[test]
    fn dot_of_nfa_has_one_edge_per_target() {
        let nfa = Automaton::builder()
            .initial("A")
            .with_finals(["B"])
            .with_transition("A", "a", ["A", "B"])
            .with_epsilon_transition("B", ["A"])
            .build()
            .unwrap();
        let dot = nfa.dot_representation();
        assert!(dot.starts_with("digraph NFA {"));
        assert!(dot.contains("\"A\" -> \"A\" [label=\"a\"]"));
        assert!(dot.contains("\"A\" -> \"B\" [label=\"a\"]"));
        assert!(dot.contains("\"B\" -> \"A\" [label=\"λ\"]"));
    }

    #[test]
    fn states_with_equal_flat_names_stay_apart() {
        let nfa = Automaton::builder()
            .initial("AB")
            .with_finals(["A"])
            .with_states(["A", "B", "AB"])
            .with_transition("AB", "x", ["A", "B"])
            .build()
            .unwrap();
        let dfa = nfa.determinize();
        assert!(dfa.contains_state(&StateId::parse("{A,B}").unwrap()));
        let dot = dfa.dot_representation();
        let nodes: Vec<&str> = dot
            .lines()
            .filter(|l| l.contains(" [shape="))
            .map(|l| l.split(" [").next().unwrap_or_default())
            .collect();
        assert_eq!(nodes.len(), dfa.size());
        assert_eq!(
            nodes.iter().collect::<std::collections::BTreeSet<_>>().len(),
            nodes.len()
        );
        assert!(dot.contains("\"AB\" -> \"{A,B}\" [label=\"x\"]"));
        assert!(dot.contains("\"{A,B}\" [shape=\"doublecircle\", label=\"AB\"]"));
        assert!(dot.contains("\"AB\" [shape=\"circle\", label=\"AB\"]"));
    }

    #[test]
    #[ignore]
    #[cfg(feature = "graphviz")]
    fn render_dfa() {
        let dfa = crate::subset::tests::abc_nfa().determinize().minimize();
        assert!(!dfa.render().unwrap().is_empty());
    }
}
