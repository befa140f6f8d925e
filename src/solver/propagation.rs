//! Unit clause propagation.
//!
//! Two strategies implement the same contract: derive every assignment forced
//! by unit clauses until either no unsatisfied clause is unit (fixpoint) or
//! some clause is fully false (conflict). The rescan strategy is the simple
//! reference semantics, the watched strategy only revisits clauses watching a
//! literal that just became false.

use super::{Conflict, PropagationMode, Solver};
use crate::{literal::Lit, solver::trail::EntryKind};
use std::mem;
use tracing::trace;

impl Solver {
    pub(crate) fn propagate(&mut self) -> Result<(), Conflict> {
        match self.mode {
            PropagationMode::Rescan => self.propagate_rescan(),
            PropagationMode::Watched => self.propagate_watched(),
        }
    }

    /// Scans the whole clause database for unit clauses, restarting from the
    /// beginning after every forced assignment since an assignment can turn
    /// earlier clauses into units.
    fn propagate_rescan(&mut self) -> Result<(), Conflict> {
        loop {
            let Some(forced) = self.find_unit() else {
                return Ok(());
            };
            trace!("propagate {forced}");
            self.assign(forced, EntryKind::Implied);
            if let Some(conflict) = self.find_conflict() {
                return Err(conflict);
            }
        }
    }

    /// The forced literal of the first clause that is unit under the current
    /// assignment: exactly one unassigned literal and no true literal.
    pub(crate) fn find_unit(&self) -> Option<Lit> {
        'clauses: for (_, clause) in self.clauses.iter() {
            let mut unassigned = None;
            for &lit in clause {
                if self.assignment.lit_is_true(lit) {
                    continue 'clauses;
                }
                if !self.assignment.is_assigned(lit.var())
                    && unassigned.replace(lit).is_some()
                {
                    // two unassigned literals
                    continue 'clauses;
                }
            }
            if let Some(lit) = unassigned {
                return Some(lit);
            }
        }
        None
    }

    /// The first clause whose literals are all false under the current
    /// assignment.
    pub(crate) fn find_conflict(&self) -> Option<Conflict> {
        self.clauses
            .iter()
            .find(|(_, clause)| clause.iter().all(|&lit| self.assignment.lit_is_false(lit)))
            .map(|(clause_id, _)| Conflict { clause: clause_id })
    }

    /// Drains the queue of falsified literals and visits only the clauses
    /// watching them, relocating watches to non-false literals where possible.
    fn propagate_watched(&mut self) -> Result<(), Conflict> {
        while let Some(false_lit) = self.pending.pop_front() {
            debug_assert!(self.assignment.lit_is_false(false_lit));
            let mut watches = mem::take(&mut self.watches[false_lit]);
            let mut conflict = None;
            watches.retain(|watch| {
                if conflict.is_some() {
                    // already failed, keep the remaining watches untouched
                    return true;
                }
                let clause = &self.clauses[watch.clause];
                let Some(other) = clause
                    .iter()
                    .copied()
                    .filter(|&lit| lit != false_lit)
                    .find(|&lit| self.watches[lit].iter().any(|w| w.clause == watch.clause))
                else {
                    // the second watch was never established (unit clause)
                    conflict = Some(Conflict { clause: watch.clause });
                    return true;
                };
                if self.assignment.lit_is_true(other) {
                    // clause is already satisfied
                    return true;
                }
                let replacement = clause
                    .iter()
                    .copied()
                    .find(|&lit| lit != other && !self.assignment.lit_is_false(lit));
                if let Some(replacement) = replacement {
                    trace!("move watch of {clause} from {false_lit} to {replacement}");
                    self.watches[replacement].push(*watch);
                    return false;
                }
                if !self.assignment.is_assigned(other.var()) {
                    // every other literal is false, `other` is forced
                    trace!("propagate {other} in clause {clause}");
                    self.assign(other, EntryKind::Implied);
                    return true;
                }
                // `other` is false as well, the clause is fully false
                conflict = Some(Conflict { clause: watch.clause });
                true
            });
            debug_assert!(self.watches[false_lit].is_empty());
            self.watches[false_lit] = watches;
            if let Some(conflict) = conflict {
                return Err(conflict);
            }
        }
        Ok(())
    }
}
