mod repository;
mod stop_pattern;
mod timetable;
mod timetable_error;
mod trip_pattern;
mod trip_times;

pub use repository::TimetableRepository;
pub use stop_pattern::StopPattern;
pub use timetable::Timetable;
pub use timetable_error::TimetableError;
pub use trip_pattern::TripPattern;
pub use trip_times::TripTimes;
