mod booking_info;
mod calendar;
mod id;
mod mode;
mod pick_drop;
mod real_time_state;
mod route;
mod stop;
mod stop_time;
mod trip;

pub use booking_info::BookingInfo;
pub use calendar::{ServiceCalendar, SERVICE_CODE_REALTIME};
pub use id::FeedScopedId;
pub use mode::TransitMode;
pub use pick_drop::PickDrop;
pub use real_time_state::RealTimeState;
pub use route::Route;
pub use stop::Stop;
pub use stop_time::StopTime;
pub use trip::{Direction, Trip};
