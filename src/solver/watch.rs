use crate::{clause::ClauseId, datastructure::LitVec, literal::Lit};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Watch {
    /// A reference to a clause where the watched literal is contained.
    pub(crate) clause: ClauseId,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct WatchList {
    watches: LitVec<Vec<Watch>>,
}

impl WatchList {
    pub(crate) fn set_var_count(&mut self, count: usize) {
        self.watches.set_var_count(count);
    }

    pub(crate) fn clear(&mut self) {
        self.watches.clear();
    }

    pub(crate) fn add_watch(&mut self, lit: Lit, watch: Watch) {
        self.watches[lit].push(watch);
    }
}

impl std::ops::Index<Lit> for WatchList {
    type Output = Vec<Watch>;

    fn index(&self, lit: Lit) -> &Self::Output {
        &self.watches[lit]
    }
}

impl std::ops::IndexMut<Lit> for WatchList {
    fn index_mut(&mut self, lit: Lit) -> &mut Self::Output {
        &mut self.watches[lit]
    }
}
