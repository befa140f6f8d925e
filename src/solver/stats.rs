use std::time::Duration;

#[derive(Debug, Default)]
pub(crate) struct Statistics {
    pub(crate) decisions: u64,
    pub(crate) implications: u64,
    pub(crate) conflicts: u64,
    pub(crate) solve_time: Duration,
}
