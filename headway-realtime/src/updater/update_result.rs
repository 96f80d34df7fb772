use itertools::Itertools;

use crate::updater::{TripRef, UpdateError};

/// per-record outcome of applying one batch.
#[derive(Debug, Default)]
pub struct UpdateResult {
    pub applied: usize,
    pub rejected: Vec<RejectedUpdate>,
}

/// one record that did not take effect, with its position in the batch.
#[derive(Debug)]
pub struct RejectedUpdate {
    pub index: usize,
    pub trip: TripRef,
    pub error: UpdateError,
}

impl UpdateResult {
    pub fn total(&self) -> usize {
        self.applied + self.rejected.len()
    }

    pub fn is_fully_applied(&self) -> bool {
        self.rejected.is_empty()
    }

    /// one-line report of every rejection, for the feed log.
    pub fn summary(&self) -> String {
        if self.rejected.is_empty() {
            return format!("{} of {} updates applied", self.applied, self.total());
        }
        let reasons = self
            .rejected
            .iter()
            .map(|r| format!("#{} {}: {}", r.index, r.trip, r.error))
            .join("; ");
        format!(
            "{} of {} updates applied, rejected: {reasons}",
            self.applied,
            self.total()
        )
    }
}
