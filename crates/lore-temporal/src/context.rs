use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A birth-year anchor and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthYear {
    pub year: i32,
    /// Stated in the text (`birth_year` attribute) rather than inferred.
    pub declared: bool,
}

impl BirthYear {
    pub fn declared(year: i32) -> Self {
        Self {
            year,
            declared: true,
        }
    }

    pub fn inferred(year: i32) -> Self {
        Self {
            year,
            declared: false,
        }
    }
}

/// Everything beyond the two instances themselves that ordering may need:
/// the entity's birth year and the project's declared reference events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineContext {
    pub birth_year: Option<BirthYear>,
    /// Reference event label → calendar year.
    pub reference_events: BTreeMap<String, i32>,
}

impl TimelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_birth_year(mut self, birth_year: BirthYear) -> Self {
        self.birth_year = Some(birth_year);
        self
    }

    pub fn with_reference_events(mut self, events: BTreeMap<String, i32>) -> Self {
        self.reference_events = events;
        self
    }

    pub fn event_year(&self, label: &str) -> Option<i32> {
        self.reference_events.get(label).copied()
    }
}
