use crate::literal::Lit;

/// Chronological record of assignment events.
/// Later entries were assigned after, and must be undone before, earlier ones.
#[derive(Debug, Clone, Default)]
pub(crate) struct Trail {
    entries: Vec<TrailEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TrailEntry {
    pub(crate) lit: Lit,
    pub(crate) kind: EntryKind,
    /// decision whose polarity was already reversed once
    pub(crate) flipped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    /// speculative assignment chosen by the decision heuristic
    Decision,
    /// assignment forced by unit propagation
    Implied,
}

/// Outcome of [`Trail::backtrack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Backtrack {
    /// An unflipped decision was found and reversed; the negated literal is
    /// the new search point and must be re-asserted by the caller.
    Resumed(Lit),
    /// The trail emptied without finding an unflipped decision.
    Exhausted,
}

impl Trail {
    pub(crate) fn push_decision(&mut self, lit: Lit) {
        self.entries.push(TrailEntry { lit, kind: EntryKind::Decision, flipped: false });
    }

    pub(crate) fn push_implied(&mut self, lit: Lit) {
        self.entries.push(TrailEntry { lit, kind: EntryKind::Implied, flipped: false });
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TrailEntry> + DoubleEndedIterator {
        self.entries.iter()
    }

    /// Undoes entries from the top of the trail, calling `unassign` for every
    /// removed literal. The first unflipped decision is re-pushed with negated
    /// polarity; already-flipped decisions and implied entries are discarded.
    pub(crate) fn backtrack<F>(&mut self, mut unassign: F) -> Backtrack
    where
        F: FnMut(Lit),
    {
        while let Some(entry) = self.entries.pop() {
            unassign(entry.lit);
            if entry.kind == EntryKind::Decision && !entry.flipped {
                let flipped = !entry.lit;
                self.entries.push(TrailEntry { lit: flipped, kind: EntryKind::Decision, flipped: true });
                return Backtrack::Resumed(flipped);
            }
        }
        Backtrack::Exhausted
    }
}
