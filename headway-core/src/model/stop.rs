use serde::{Deserialize, Serialize};

use crate::model::FeedScopedId;

/// a boardable location referenced by stop patterns. station hierarchy,
/// coordinates and transfers live with the street model, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stop {
    pub id: FeedScopedId,
    pub name: String,
}

impl Stop {
    pub fn new(id: FeedScopedId, name: &str) -> Stop {
        Stop {
            id,
            name: name.to_owned(),
        }
    }
}
