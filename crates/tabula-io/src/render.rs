use std::io::{self, Write};

use tabula_solver::{Basis, Event, Int, Observer, Outcome, Tableau};

/// Draws a tableau as a box table.
///
/// Column 0 is headed `b` and the others `x[1]..x[n]`. Row 0 is labelled
/// `-z`; constraint rows carry the name of their basic variable when a basis
/// is given.
pub fn render_tableau<I: Int>(tableau: &Tableau<I>, basis: Option<&Basis>) -> String {
    let mut header = vec![String::new(), "b".to_string()];
    header.extend((1..=tableau.nr_columns()).map(|col| format!("x[{col}]")));

    let mut rows = vec![header];
    for (index, row) in tableau.rows().enumerate() {
        let label = match (index, basis) {
            (0, _) => "-z".to_string(),
            (_, Some(basis)) if index <= basis.len() => format!("x[{}]", basis.in_row(index)),
            _ => format!("r{index}"),
        };
        let mut cells = vec![label];
        cells.extend(row.iter().map(ToString::to_string));
        rows.push(cells);
    }

    let widths: Vec<usize> = (0..rows[0].len())
        .map(|col| rows.iter().map(|row| row[col].chars().count()).max().unwrap_or(0))
        .collect();

    let rule = |left: &str, middle: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|width| "─".repeat(width + 2)).collect();
        format!("{left}{}{right}", segments.join(middle))
    };

    let mut lines = vec![rule("┌", "┬", "┐")];
    for (index, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!(" {cell:>width$} "))
            .collect();
        lines.push(format!("│{}│", cells.join("│")));
        // Rule under the header and under the objective row.
        if index < 2 && index + 1 < rows.len() {
            lines.push(rule("├", "┼", "┤"));
        }
    }
    lines.push(rule("└", "┴", "┘"));
    lines.join("\n")
}

/// Writes a step-by-step account of a solve.
///
/// Write failures do not interrupt the solve; the first one is kept and
/// returned by [`Printer::finish`].
pub struct Printer<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn print<I: Int>(&mut self, event: &Event<'_, I>) -> io::Result<()> {
        let out = &mut self.out;
        match event {
            Event::Started { stage } => writeln!(out, "== {stage} =="),
            Event::Iteration {
                iteration,
                tableau,
                basis,
                ..
            } => {
                writeln!(out, "Current tableau - itr: {iteration}")?;
                writeln!(out, "{}", render_tableau(tableau, Some(*basis)))
            }
            Event::Pivot {
                entering,
                leaving,
                element,
                ..
            } => {
                writeln!(out, "x[{entering}] enters the basis.")?;
                writeln!(out, "Current pivot element = {element}")?;
                writeln!(out, "x[{leaving}] leaves the basis.")
            }
            Event::Degeneracy {
                row,
                artificial,
                entering,
            } => writeln!(
                out,
                "Artificial x[{artificial}] is basic at zero level in row {row}; x[{entering}] replaces it."
            ),
            Event::Cut { round, source_row } => {
                writeln!(out, "Adding Gomory cut {round} from row {source_row}.")
            }
            Event::Finished {
                outcome, objective, ..
            } => match outcome {
                Outcome::Optimal => {
                    writeln!(out, "Found an optimal solution.")?;
                    match objective {
                        Some(cost) => writeln!(out, "Cost = {cost}"),
                        None => Ok(()),
                    }
                }
                Outcome::Unbounded => writeln!(out, "Problem is unbounded."),
                Outcome::Feasible => writeln!(out, "Found a feasible basis."),
                Outcome::Infeasible => writeln!(out, "Problem is infeasible."),
            },
        }
    }
}

impl<W: Write, I: Int> Observer<I> for Printer<W> {
    fn on_event(&mut self, event: &Event<'_, I>) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = self.print(event) {
            tracing::warn!(%error, "cannot write trace");
            self.error = Some(error);
        }
    }
}
