use std::fmt::Display;

use owo_colors::OwoColorize;

use crate::prelude::*;

/// One row of a [`TransitionTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// The state the row belongs to.
    pub state: StateId,
    /// Whether the state is initial.
    pub initial: bool,
    /// Whether the state is final.
    pub accepting: bool,
    /// One cell per column, holding the reached state or `None` if there is no successor.
    pub cells: Vec<Option<StateId>>,
}

/// A view of the transition function with one row per state and one column per label. For a
/// deterministic automaton every cell holds the single successor, for a nondeterministic one
/// the set of successors is shown as a composite state. Automata that still contain epsilon
/// transitions get an additional `λ` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    columns: Vec<Label>,
    rows: Vec<TableRow>,
}

impl TransitionTable {
    /// Builds the table of `automaton`, performing one lookup in its [`TransitionIndex`]
    /// per cell.
    pub fn new(automaton: &Automaton) -> Self {
        let index = automaton.index();
        let mut columns: Vec<Label> = automaton.alphabet().iter().map(Label::from).collect();
        if automaton.has_epsilon_transitions() {
            columns.push(Label::Epsilon);
        }
        let rows = automaton
            .states()
            .iter()
            .map(|q| TableRow {
                state: q.clone(),
                initial: q == automaton.initial(),
                accepting: automaton.is_final(q),
                cells: columns
                    .iter()
                    .map(|l| match index.successors(q, l) {
                        [only] => Some(only.clone()),
                        targets => StateId::compose(targets.iter().cloned()),
                    })
                    .collect(),
            })
            .collect();
        Self { columns, rows }
    }

    /// The labels of the columns.
    pub fn columns(&self) -> &[Label] {
        &self.columns
    }

    /// The rows, in the order of the states of the automaton.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Looks up the cell for `state` and `label`.
    pub fn cell(&self, state: &StateId, label: &Label) -> Option<&StateId> {
        let column = self.columns.iter().position(|l| l == label)?;
        self.rows
            .iter()
            .find(|row| &row.state == state)
            .and_then(|row| row.cells[column].as_ref())
    }

    fn build<F>(&self, decorate: F) -> String
    where
        F: Fn(&TableRow) -> String,
    {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(self.columns.iter().map(|l| l.show())),
        );
        for row in &self.rows {
            builder.push_record(
                std::iter::once(decorate(row)).chain(row.cells.iter().map(|c| c.show())),
            );
        }
        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }

    /// Renders the table with the initial state in bold and final states in green.
    pub fn show_colored(&self) -> String {
        self.build(|row| {
            let name = row.state.show();
            match (row.initial, row.accepting) {
                (true, true) => name.bold().green().to_string(),
                (true, false) => name.bold().to_string(),
                (false, true) => name.green().to_string(),
                (false, false) => name,
            }
        })
    }
}

impl Display for TransitionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered = self.build(|row| {
            format!(
                "{}{}{}",
                if row.initial { "→" } else { "" },
                if row.accepting { "*" } else { "" },
                row.state
            )
        });
        write!(f, "{rendered}")
    }
}

impl Automaton {
    /// Returns the [`TransitionTable`] of `self`.
    pub fn transition_table(&self) -> TransitionTable {
        TransitionTable::new(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn table_of_dfa() {
        let dfa = crate::subset::tests::abc_nfa().determinize();
        let table = dfa.transition_table();
        let ab = StateId::parse("{A,B}").unwrap();
        assert_eq!(table.columns().len(), 2);
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.cell(&"A".into(), &Label::from("0")), Some(&ab));
        assert!(table.rows()[0].initial);

        let rendered = table.to_string();
        assert!(rendered.contains("→A"));
        assert!(rendered.contains("*{A,C}"));
        assert!(!table.show_colored().is_empty());
    }

    #[test]
    fn table_of_nfa_shows_sets_and_gaps() {
        let nfa = Automaton::builder()
            .initial("A")
            .with_finals(["B"])
            .with_alphabet_symbols(["b"])
            .with_transition("A", "a", ["A", "B"])
            .with_epsilon_transition("B", ["A"])
            .build()
            .unwrap();
        let table = nfa.transition_table();
        assert_eq!(table.columns().last(), Some(&Label::Epsilon));
        assert_eq!(
            table.cell(&"A".into(), &Label::from("a")),
            Some(&StateId::parse("{A,B}").unwrap())
        );
        assert_eq!(table.cell(&"A".into(), &Label::from("b")), None);
        assert_eq!(
            table.cell(&"B".into(), &Label::Epsilon),
            Some(&StateId::from("A"))
        );
        assert!(table.to_string().contains('-'));
    }

    #[test]
    fn composite_successors_are_shown_as_they_are() {
        let dfa = crate::subset::tests::abc_nfa().determinize();
        let again = dfa.determinize();
        let table = again.transition_table();
        let wrapped = StateId::singleton(StateId::parse("{A,B}").unwrap());
        assert_eq!(table.cell(&"A".into(), &Label::from("0")), Some(&wrapped));
        assert_eq!(
            dfa.transition_table().cell(&"A".into(), &Label::from("0")),
            Some(&StateId::parse("{A,B}").unwrap())
        );
    }
}
