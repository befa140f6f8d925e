//! The DPLL search engine: chronological backtracking over a static clause set.

use self::{
    assignment::Assignment,
    order::DecisionOrder,
    stats::Statistics,
    trail::{Backtrack, EntryKind, Trail},
    watch::{Watch, WatchList},
};
use crate::{
    clause::{ClauseDatabase, ClauseId},
    cnf::Cnf,
    dimacs::FromDimacs,
    literal::{Lit, LitSlice, Var},
    SolverResult,
};
use std::{collections::VecDeque, mem, time::Instant};
use tracing::{debug, info, trace};

pub(crate) mod assignment;
pub(crate) mod order;
pub(crate) mod propagation;
pub(crate) mod stats;
pub(crate) mod trail;
pub(crate) mod watch;


/// Selects the unit propagation strategy, see [`propagation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PropagationMode {
    /// Re-scan the whole clause database after every forced assignment.
    Rescan,
    /// Incremental two-watched-literal scheme.
    #[default]
    Watched,
}

#[derive(Debug, Default)]
pub struct Solver {
    clauses: ClauseDatabase,
    /// unit input clauses, consumed by the watched strategy at init
    units: Vec<(Lit, ClauseId)>,
    assignment: Assignment,
    trail: Trail,
    watches: WatchList,
    /// falsified literals whose watching clauses still need to be visited
    pending: VecDeque<Lit>,
    order: DecisionOrder,
    mode: PropagationMode,
    /// set to true if the empty clause was added
    conflicted: bool,
    stats: Statistics,
}

/// A clause whose literals are all false under the current assignment.
/// This is a control-flow signal driving backtracking, not an error.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Conflict {
    pub(crate) clause: ClauseId,
}

/// Outcome of the search, together with a witness in the satisfiable case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Sat(Model),
    Unsat,
}

impl Verdict {
    #[must_use]
    pub fn result(&self) -> SolverResult {
        match self {
            Verdict::Sat(_) => SolverResult::Satisfiable,
            Verdict::Unsat => SolverResult::Unsatisfiable,
        }
    }

    #[must_use]
    pub fn model(&self) -> Option<&Model> {
        match self {
            Verdict::Sat(model) => Some(model),
            Verdict::Unsat => None,
        }
    }
}

/// A satisfying assignment, one literal per variable in variable order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    lits: Vec<Lit>,
}

impl Model {
    #[must_use]
    pub fn lit(&self, var: Var) -> Lit {
        self.lits[var.as_index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = Lit> + '_ {
        self.lits.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// True if at least one literal of `lits` is true under this model.
    #[must_use]
    pub fn satisfies(&self, lits: &[Lit]) -> bool {
        lits.iter().any(|&lit| self.lit(lit.var()) == lit)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, lit) in self.lits.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "{lit}")?;
        }
        Ok(())
    }
}

/// Public interface
impl Solver {
    #[must_use]
    pub fn from_cnf(cnf: &Cnf) -> Self {
        let mut solver = Self::default();
        solver.set_var_count(usize::try_from(cnf.num_vars()).unwrap());
        for clause in cnf.clauses() {
            solver.add_clause(clause);
        }
        solver
    }

    pub fn set_propagation(&mut self, mode: PropagationMode) {
        self.mode = mode;
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.assignment.var_count()
    }

    #[must_use]
    pub fn num_clauses(&self) -> usize {
        self.clauses.num_clauses()
    }

    /// Adds a clause consisting of the provided literals.
    pub fn add_clause(&mut self, lits: &[Lit]) {
        debug!("add clause {}", LitSlice::from(lits));
        let mut lits = Vec::from(lits);
        lits.sort_unstable();
        lits.dedup();
        if lits.iter().zip(lits.iter().skip(1)).any(|(&left, &right)| left == !right) {
            // Detected tautology clause, do not add to the database.
            // Note: as literals are deduplicated and sorted by variable index,
            // literals of opposing signs have to be consecutive in the clause.
            return;
        }

        if let Some(max_count) = lits.iter().map(|lit| lit.var().as_index() + 1).max() {
            if max_count > self.num_vars() {
                self.set_var_count(max_count);
            }
        }

        let clause_id = self.clauses.add(&lits);
        match lits[..] {
            [] => {
                // empty clause, the formula is unsatisfiable
                tracing::warn!("empty clause was added, formula is unsatisfiable");
                self.conflicted = true;
            }
            [lit] => self.units.push((lit, clause_id)),
            _ => {}
        }
    }

    /// Decides satisfiability of the loaded formula.
    pub fn solve(&mut self) -> Verdict {
        let instant = Instant::now();
        let verdict = self.search();
        self.stats.solve_time = instant.elapsed();
        info!("\n{:#?}", self.stats);
        verdict
    }
}

impl Solver {
    fn set_var_count(&mut self, count: usize) {
        if count <= self.num_vars() {
            return;
        }
        self.assignment.set_var_count(count);
        self.watches.set_var_count(count);
    }

    fn search(&mut self) -> Verdict {
        if self.conflicted {
            return Verdict::Unsat;
        }
        if let Err(conflict) = self.init().and_then(|()| self.propagate()) {
            debug!("conflict at root level in clause {}", self.clauses[conflict.clause]);
            return Verdict::Unsat;
        }
        loop {
            let Some(decision) = self.order.next_unassigned(&self.assignment) else {
                return Verdict::Sat(self.extract_model());
            };
            self.stats.decisions += 1;
            trace!("decide {decision}");
            self.assign(decision, EntryKind::Decision);
            while let Err(conflict) = self.propagate() {
                self.stats.conflicts += 1;
                trace!("conflict in clause {}", self.clauses[conflict.clause]);
                match self.backtrack() {
                    Backtrack::Resumed(flipped) => trace!("flip decision to {flipped}"),
                    Backtrack::Exhausted => return Verdict::Unsat,
                }
            }
        }
    }

    /// Prepares the search: builds the decision ordering and, for the watched
    /// strategy, the watch lists. Unit input clauses carry no watches, so they
    /// are asserted here as root-level implications; the rescan strategy
    /// instead discovers them through its scan, which interleaves the conflict
    /// check with every forced assignment.
    fn init(&mut self) -> Result<(), Conflict> {
        self.order = DecisionOrder::build(&self.clauses, self.num_vars());
        self.pending.clear();
        if self.mode == PropagationMode::Watched {
            self.build_watchlist();
            for (lit, clause_id) in mem::take(&mut self.units) {
                if self.assignment.lit_is_true(lit) {
                    continue;
                }
                if self.assignment.lit_is_false(lit) {
                    return Err(Conflict { clause: clause_id });
                }
                self.assign(lit, EntryKind::Implied);
            }
        }
        Ok(())
    }

    fn build_watchlist(&mut self) {
        self.watches.clear();
        for (clause_id, clause) in self.clauses.iter() {
            let lits = clause.lits();
            if lits.len() < 2 {
                // unit clauses are asserted at the root, the empty clause
                // flags the formula as conflicted
                continue;
            }
            self.watches.add_watch(lits[0], Watch { clause: clause_id });
            self.watches.add_watch(lits[1], Watch { clause: clause_id });
        }
    }

    /// Updates the internal state to reflect that `lit` is assigned.
    pub(crate) fn assign(&mut self, lit: Lit, kind: EntryKind) {
        debug_assert!(!self.assignment.is_assigned(lit.var()));
        self.assignment.assign(lit);
        match kind {
            EntryKind::Decision => self.trail.push_decision(lit),
            EntryKind::Implied => {
                self.trail.push_implied(lit);
                self.stats.implications += 1;
            }
        }
        if self.mode == PropagationMode::Watched {
            self.pending.push_back(!lit);
        }
        debug_assert_eq!(self.assignment.num_assigned(), self.trail.len());
    }

    /// Undoes trail entries until an unflipped decision is reversed.
    /// Pending propagation work from the conflicting state is discarded,
    /// not replayed.
    fn backtrack(&mut self) -> Backtrack {
        self.pending.clear();
        let result = self.trail.backtrack(|lit| self.assignment.unassign(lit.var()));
        if let Backtrack::Resumed(flipped) = result {
            self.assignment.assign(flipped);
            if self.mode == PropagationMode::Watched {
                self.pending.push_back(!flipped);
            }
        }
        debug_assert_eq!(self.assignment.num_assigned(), self.trail.len());
        result
    }

    /// Assembles the witness from the assignment store. Variables the search
    /// never touched are unconstrained and are completed with their positive
    /// literal: such variables never occur negated (otherwise the decision
    /// ordering would have picked them), so the positive polarity satisfies
    /// every clause they appear in.
    fn extract_model(&self) -> Model {
        let lits = (0..self.num_vars())
            .map(|idx| {
                let var = Var::from_index(idx.try_into().unwrap());
                self.assignment.assigned_lit(var).unwrap_or_else(|| var.positive())
            })
            .collect();
        Model { lits }
    }
}

impl FromDimacs for Solver {
    fn set_num_variables(&mut self, variables: u32) {
        self.set_var_count(usize::try_from(variables).unwrap());
    }

    fn set_num_clauses(&mut self, clauses: u32) {
        self.clauses.reserve(clauses);
    }

    fn add_clause(&mut self, lits: &[Lit]) {
        self.add_clause(lits);
    }
}
