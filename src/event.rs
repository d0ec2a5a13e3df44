use serde::{Deserialize, Serialize};

/// Normalized record of one candidate calendar event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    pub summary: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
}

impl EventDetails {
    /// A record can be scheduled only once both a title and a date are known
    pub fn is_usable(&self) -> bool {
        has_value(&self.summary) && has_value(&self.date)
    }
}

/// Blank strings count as missing
fn has_value(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}
