//! A straight-forward representation of a propositional formula in CNF.

use crate::{dimacs::FromDimacs, literal::Lit};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    num_vars: u32,
    clauses: Vec<Vec<Lit>>,
}

impl Cnf {
    #[must_use]
    pub fn from_clauses(clauses: &[&[i32]]) -> Self {
        let mut cnf = Cnf::default();
        let mut lits = Vec::new();
        for &clause in clauses {
            lits.clear();
            lits.extend(clause.iter().map(|&lit| Lit::from_dimacs(lit)));
            cnf.add_clause(&lits);
        }
        cnf
    }

    pub fn add_clause(&mut self, lits: &[Lit]) {
        for &lit in lits {
            let var_count = u32::try_from(lit.var().as_index()).unwrap() + 1;
            self.num_vars = self.num_vars.max(var_count);
        }
        self.clauses.push(lits.to_vec());
    }

    #[must_use]
    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    #[must_use]
    pub fn num_clauses(&self) -> u32 {
        self.clauses.len().try_into().unwrap()
    }

    #[must_use]
    pub fn clauses(&self) -> &[Vec<Lit>] {
        &self.clauses
    }
}

impl FromDimacs for Cnf {
    fn set_num_variables(&mut self, variables: u32) {
        self.num_vars = self.num_vars.max(variables);
    }

    fn set_num_clauses(&mut self, clauses: u32) {
        self.clauses.reserve(usize::try_from(clauses).unwrap());
    }

    fn add_clause(&mut self, lits: &[Lit]) {
        self.add_clause(lits);
    }
}

impl std::fmt::Display for Cnf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.num_clauses())?;
        for clause in &self.clauses {
            for lit in clause {
                write!(f, "{lit} ")?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
macro_rules! cnf_formula {
    ( $( $( $lit:literal )+ ; )* ) => {
        crate::cnf::Cnf::from_clauses(&[ $( &[ $( $lit ),+ ][..] ),* ])
    };
}

/// Provides a strategy for randomly generating CNF formulas.
#[cfg(test)]
pub(crate) mod strategy {
    use super::Cnf;
    use crate::literal::strategy::lit;
    use proptest::{
        collection::{self, SizeRange},
        prelude::*,
    };

    /// A strategy to generate a CNF formula with the provided parameters.
    pub(crate) fn cnf(
        max_var_idx: u32,
        clauses: impl Into<SizeRange>,
        clause_len: impl Into<SizeRange>,
    ) -> impl Strategy<Value = Cnf> {
        collection::vec(collection::vec(lit(0..max_var_idx), clause_len), clauses)
            .prop_map(|matrix| {
                let mut cnf = Cnf::default();
                for clause in &matrix {
                    cnf.add_clause(clause);
                }
                cnf
            })
            .no_shrink()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::literal::Var;

    #[test]
    fn cnf_macro() {
        let cnf = cnf_formula![
            1 2;
            -1 2;
            -2;
        ];
        assert_eq!(cnf.num_clauses(), 3);
        assert_eq!(cnf.num_vars(), 2);
    }

    #[test]
    fn empty_formula() {
        let cnf = cnf_formula![];
        assert_eq!(cnf.num_clauses(), 0);
        assert_eq!(cnf.num_vars(), 0);
    }

    #[test]
    fn var_count_tracks_largest_literal() {
        let mut cnf = Cnf::default();
        cnf.add_clause(&[Lit::from_dimacs(-5)]);
        assert_eq!(cnf.num_vars(), 5);
        assert_eq!(cnf.clauses()[0], vec![Var::from_dimacs(5).negative()]);
    }

    #[test]
    fn display() {
        let cnf = cnf_formula![
            1 -2;
            2;
        ];
        assert_eq!(format!("{cnf}"), "p cnf 2 2\n1 -2 0\n2 0\n");
    }
}
