use serde::{Deserialize, Serialize};

use crate::model::{FeedScopedId, TransitMode};

/// a named line operating one transit mode. trips reference their route
/// through a shared handle; the route itself stays immutable after build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    pub id: FeedScopedId,
    pub short_name: String,
    pub long_name: Option<String>,
    pub mode: TransitMode,
}

impl Route {
    pub fn new(id: FeedScopedId, short_name: &str, mode: TransitMode) -> Route {
        Route {
            id,
            short_name: short_name.to_owned(),
            long_name: None,
            mode,
        }
    }

    /// the name shown to riders: the short name when present, else the long name.
    pub fn display_name(&self) -> &str {
        if self.short_name.is_empty() {
            self.long_name.as_deref().unwrap_or(self.id.id())
        } else {
            &self.short_name
        }
    }
}
