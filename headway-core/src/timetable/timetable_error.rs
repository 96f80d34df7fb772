use crate::model::FeedScopedId;

#[derive(thiserror::Error, Debug)]
pub enum TimetableError {
    #[error("trip {0} has a malformed schedule: {1}")]
    MalformedSchedule(FeedScopedId, String),
    #[error("trip {trip} has {trip_stops} stops but pattern {pattern} has {pattern_stops}")]
    StopCountMismatch {
        trip: FeedScopedId,
        trip_stops: usize,
        pattern: FeedScopedId,
        pattern_stops: usize,
    },
}
