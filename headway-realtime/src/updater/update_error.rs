use chrono::NaiveDate;

use headway_core::model::FeedScopedId;
use headway_core::timetable::TimetableError;

use crate::snapshot::SnapshotError;

/// why a single real-time record was rejected. a rejection never poisons the
/// batch; the remaining records still apply and commit.
#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("no trip {0} on service date {1}")]
    UnknownTrip(FeedScopedId, NaiveDate),
    #[error("trip {0} has no stop with sequence {1}")]
    UnknownStopSequence(FeedScopedId, u32),
    /// applying the record would leave the trip with a negative dwell or hop;
    /// the staged change is discarded and the prior state kept.
    #[error("update would make the stop times of trip {0} non-increasing")]
    InconsistentUpdate(FeedScopedId),
    #[error("trip {0} fits no existing pattern and pattern synthesis is disabled")]
    PatternStructureRequired(FeedScopedId),
    #[error(transparent)]
    MalformedSchedule(#[from] TimetableError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
