mod applier;
mod messages;
mod policy;
mod update_error;
mod update_result;

pub use applier::UpdateApplier;
pub use messages::{
    AddedTrip, StopTimeUpdate, TimeUpdate, TripRef, UpdateBatch, UpdateMessage,
};
pub use policy::PatternSynthesisPolicy;
pub use update_error::UpdateError;
pub use update_result::{RejectedUpdate, UpdateResult};
