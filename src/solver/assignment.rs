use crate::{
    datastructure::VarVec,
    literal::{Lit, Var},
};

/// Dense mapping from variable to its currently asserted value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Assignment {
    assignment: VarVec<Option<Value>>,
    num_assigned: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Value {
    True,
    False,
}

impl Assignment {
    pub(crate) fn set_var_count(&mut self, count: usize) {
        self.assignment.set_var_count(count);
    }

    pub(crate) fn var_count(&self) -> usize {
        self.assignment.get_var_count()
    }

    /// Asserts `lit`; the literal's variable must be unassigned.
    pub(crate) fn assign(&mut self, lit: Lit) {
        let slot = &mut self.assignment[lit.var()];
        assert!(slot.is_none(), "variable {} is already assigned", lit.var());
        *slot = Some(if lit.is_positive() { Value::True } else { Value::False });
        self.num_assigned += 1;
    }

    pub(crate) fn unassign(&mut self, var: Var) {
        let old_value = self.assignment[var].take();
        assert!(old_value.is_some());
        self.num_assigned -= 1;
    }

    pub(crate) fn is_assigned(&self, var: Var) -> bool {
        self.assignment[var].is_some()
    }

    pub(crate) fn num_assigned(&self) -> usize {
        self.num_assigned
    }

    fn value_of(&self, lit: Lit) -> Option<bool> {
        self.assignment[lit.var()].map(|value| (value == Value::True) == lit.is_positive())
    }

    pub(crate) fn lit_is_true(&self, lit: Lit) -> bool {
        self.value_of(lit) == Some(true)
    }

    pub(crate) fn lit_is_false(&self, lit: Lit) -> bool {
        self.value_of(lit) == Some(false)
    }

    /// The literal currently asserted for `var`, if any.
    pub(crate) fn assigned_lit(&self, var: Var) -> Option<Lit> {
        self.assignment[var].map(|value| match value {
            Value::True => var.positive(),
            Value::False => var.negative(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn assignment() {
        let mut assignment = Assignment::default();
        assignment.set_var_count(10);
        let var1 = Var::from_dimacs(1);
        assert!(!assignment.is_assigned(var1));

        assignment.assign(var1.negative());
        assert!(assignment.is_assigned(var1));
        assert!(assignment.lit_is_true(var1.negative()));
        assert!(assignment.lit_is_false(var1.positive()));
        assert_eq!(assignment.assigned_lit(var1), Some(var1.negative()));
        assert_eq!(assignment.num_assigned(), 1);

        assignment.unassign(var1);
        assert!(!assignment.is_assigned(var1));
        assert!(!assignment.lit_is_false(var1.positive()));
        assert_eq!(assignment.num_assigned(), 0);
    }

    #[test]
    #[should_panic]
    fn double_assign() {
        let mut assignment = Assignment::default();
        assignment.set_var_count(1);
        let var1 = Var::from_dimacs(1);
        assignment.assign(var1.positive());
        assignment.assign(var1.negative());
    }
}
