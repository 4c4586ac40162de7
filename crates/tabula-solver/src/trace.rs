//! Side-channel for following a solve step by step.
//!
//! Algorithms report what they do to an [`Observer`]; nothing they decide
//! depends on it.
use std::fmt;

use crate::rational::{Int, Rational};
use crate::tableau::{Basis, Tableau};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PrimalSimplex,
    DualSimplex,
    PhaseOne,
    CuttingPlane,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::PrimalSimplex => "simplex",
            Stage::DualSimplex => "dual simplex",
            Stage::PhaseOne => "phase one",
            Stage::CuttingPlane => "cutting plane",
        };
        f.write_str(name)
    }
}

/// How a stage ended.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Optimal,
    Unbounded,
    Feasible,
    Infeasible,
}

#[derive(Debug)]
pub enum Event<'a, I: Int> {
    Started {
        stage: Stage,
    },
    /// Snapshot taken before each optimality test.
    Iteration {
        stage: Stage,
        iteration: usize,
        tableau: &'a Tableau<I>,
        basis: &'a Basis,
    },
    Pivot {
        stage: Stage,
        entering: usize,
        leaving: usize,
        element: &'a Rational<I>,
    },
    /// An artificial variable left basic at zero level was swapped out.
    Degeneracy {
        row: usize,
        artificial: usize,
        entering: usize,
    },
    Cut {
        round: usize,
        source_row: usize,
    },
    Finished {
        stage: Stage,
        outcome: Outcome,
        objective: Option<Rational<I>>,
    },
}

pub trait Observer<I: Int> {
    fn on_event(&mut self, event: &Event<'_, I>);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl<I: Int> Observer<I> for Silent {
    fn on_event(&mut self, _event: &Event<'_, I>) {}
}

/// Owned summary of an [`Event`], without the tableau snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Record<I: Int = i32> {
    Started(Stage),
    Iteration(Stage, usize),
    Pivot {
        stage: Stage,
        entering: usize,
        leaving: usize,
        element: Rational<I>,
    },
    Degeneracy {
        row: usize,
        artificial: usize,
        entering: usize,
    },
    Cut {
        round: usize,
        source_row: usize,
    },
    Finished(Stage, Outcome, Option<Rational<I>>),
}

/// Keeps a [`Record`] of every event it sees.
#[derive(Debug, Clone, Default)]
pub struct Recorder<I: Int = i32> {
    pub records: Vec<Record<I>>,
}

impl<I: Int> Recorder<I> {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Pivots performed, as `(stage, entering, leaving)`.
    pub fn pivots(&self) -> Vec<(Stage, usize, usize)> {
        self.records
            .iter()
            .filter_map(|record| match record {
                Record::Pivot {
                    stage,
                    entering,
                    leaving,
                    ..
                } => Some((*stage, *entering, *leaving)),
                _ => None,
            })
            .collect()
    }

    pub fn cuts(&self) -> usize {
        self.records
            .iter()
            .filter(|record| matches!(record, Record::Cut { .. }))
            .count()
    }
}

impl<I: Int> Observer<I> for Recorder<I> {
    fn on_event(&mut self, event: &Event<'_, I>) {
        let record = match event {
            Event::Started { stage } => Record::Started(*stage),
            Event::Iteration { stage, iteration, .. } => Record::Iteration(*stage, *iteration),
            Event::Pivot {
                stage,
                entering,
                leaving,
                element,
            } => Record::Pivot {
                stage: *stage,
                entering: *entering,
                leaving: *leaving,
                element: (*element).clone(),
            },
            Event::Degeneracy {
                row,
                artificial,
                entering,
            } => Record::Degeneracy {
                row: *row,
                artificial: *artificial,
                entering: *entering,
            },
            Event::Cut { round, source_row } => Record::Cut {
                round: *round,
                source_row: *source_row,
            },
            Event::Finished {
                stage,
                outcome,
                objective,
            } => Record::Finished(*stage, *outcome, objective.clone()),
        };
        self.records.push(record);
    }
}
