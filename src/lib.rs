#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_panics_doc, clippy::module_name_repetitions)]

use std::{
    fmt::Display,
    process::{ExitCode, Termination},
};

#[macro_use]
pub mod cnf;
mod clause;
pub mod cli;
mod datastructure;
pub mod dimacs;
mod literal;
pub mod solver;

// Re-export
pub use literal::{Lit, Var};
pub use solver::{Model, PropagationMode, Solver, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SolverResult {
    Satisfiable = 10,
    Unsatisfiable = 20,
}

impl Display for SolverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Satisfiable => write!(f, "sat"),
            SolverResult::Unsatisfiable => write!(f, "unsat"),
        }
    }
}

impl Termination for SolverResult {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}
