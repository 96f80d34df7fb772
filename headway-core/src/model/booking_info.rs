use serde::{Deserialize, Serialize};

/// how a rider arranges a demand-responsive pickup or drop-off.
///
/// the routing core treats this as an opaque record attached to stop times;
/// itinerary rendering interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingInfo {
    pub contact: Option<String>,
    pub booking_url: Option<String>,
    pub message: Option<String>,
    /// seconds before scheduled departure by which the booking must exist.
    pub latest_booking_notice: Option<i32>,
}

impl BookingInfo {
    pub fn with_contact(contact: &str) -> BookingInfo {
        BookingInfo {
            contact: Some(contact.to_owned()),
            ..Default::default()
        }
    }
}
