//! Static decision ordering.
//!
//! Candidate literals are scored once, before the search starts, from the
//! clause structure: every clause containing a negative literal contributes
//! `2^-len` to that variable's score, so shorter clauses weigh exponentially
//! more. Variables that never occur negated receive no entry and are left
//! entirely to unit propagation.

use super::assignment::Assignment;
use crate::{
    clause::ClauseDatabase,
    datastructure::VarVec,
    literal::{Lit, Var},
};
use ordered_float::NotNan;

#[derive(Debug, Clone, Default)]
pub(crate) struct DecisionOrder {
    /// Candidate decision literals, highest score first.
    candidates: Vec<Lit>,
}

impl DecisionOrder {
    pub(crate) fn build(clauses: &ClauseDatabase, var_count: usize) -> Self {
        let mut scores: VarVec<Option<NotNan<f64>>> = VarVec::default();
        scores.set_var_count(var_count);
        let zero = NotNan::new(0.0).unwrap();
        for (_, clause) in clauses.iter() {
            let weight = clause_weight(clause.len());
            for &lit in clause.iter().filter(|lit| lit.is_negative()) {
                *scores[lit.var()].get_or_insert(zero) += weight;
            }
        }

        let mut scored: Vec<(NotNan<f64>, Var)> =
            scores.iter().filter_map(|(var, score)| score.map(|score| (score, var))).collect();
        // stable sort, equal scores keep ascending variable order
        scored.sort_by(|lhs, rhs| rhs.0.cmp(&lhs.0));
        Self { candidates: scored.into_iter().map(|(_, var)| var.negative()).collect() }
    }

    /// The first candidate literal whose variable is still unassigned.
    pub(crate) fn next_unassigned(&self, assignment: &Assignment) -> Option<Lit> {
        self.candidates.iter().copied().find(|lit| !assignment.is_assigned(lit.var()))
    }

    #[cfg(test)]
    pub(crate) fn candidates(&self) -> &[Lit] {
        &self.candidates
    }
}

#[allow(clippy::cast_precision_loss)]
fn clause_weight(len: usize) -> NotNan<f64> {
    NotNan::new((-(len as f64)).exp2()).unwrap()
}

#[cfg(test)]
mod test {
    use super::*;

    fn database(clauses: &[&[i32]]) -> ClauseDatabase {
        let mut db = ClauseDatabase::default();
        for &clause in clauses {
            let lits: Vec<Lit> = clause.iter().map(|&lit| Lit::from_dimacs(lit)).collect();
            db.add(&lits);
        }
        db
    }

    #[test]
    fn shorter_clauses_score_higher() {
        let db = database(&[&[-1, 2], &[-2], &[-1, -3, 2]]);
        let order = DecisionOrder::build(&db, 3);
        // var 2: 2^-1, var 1: 2^-2 + 2^-3, var 3: 2^-3
        assert_eq!(
            order.candidates(),
            &[Lit::from_dimacs(-2), Lit::from_dimacs(-1), Lit::from_dimacs(-3)]
        );
    }

    #[test]
    fn purely_positive_variables_are_never_candidates() {
        let db = database(&[&[1, 2], &[-1, 2]]);
        let order = DecisionOrder::build(&db, 2);
        assert_eq!(order.candidates(), &[Lit::from_dimacs(-1)]);
    }

    #[test]
    fn ties_keep_variable_order() {
        let db = database(&[&[-3, -1], &[-2, 4]]);
        let order = DecisionOrder::build(&db, 4);
        // vars 1 and 3 tie at 2^-2, var 2 ties as well
        assert_eq!(
            order.candidates(),
            &[Lit::from_dimacs(-1), Lit::from_dimacs(-2), Lit::from_dimacs(-3)]
        );
    }

    #[test]
    fn skips_assigned_variables() {
        let db = database(&[&[-1, -2]]);
        let order = DecisionOrder::build(&db, 2);
        let mut assignment = Assignment::default();
        assignment.set_var_count(2);
        assignment.assign(Lit::from_dimacs(1));
        assert_eq!(order.next_unassigned(&assignment), Some(Lit::from_dimacs(-2)));
        assignment.assign(Lit::from_dimacs(-2));
        assert_eq!(order.next_unassigned(&assignment), None);
    }
}
