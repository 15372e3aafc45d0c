use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "Other";

/// Categories offered to the user. Any other label is accepted too.
pub const CATEGORY_SUGGESTIONS: [&str; 5] =
    ["Health", "Productivity", "Exercise", "Learning", DEFAULT_CATEGORY];

/// The struct used for storing a routine on the disk. The routine name is not part of it, since
/// routines are stored as a mapping from name to [RoutineEntity].
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct RoutineEntity {
    #[serde(with = "hh_mm")]
    pub time: NaiveTime,
    /// Lifetime completion counter. It is never reset when a day is skipped.
    pub streak: u32,
    pub last_completed: Option<NaiveDate>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub temporary: bool,
    pub end_date: Option<NaiveDate>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl RoutineEntity {
    pub fn new(time: NaiveTime, category: String, lifetime: Lifetime) -> Self {
        let end_date = match lifetime {
            Lifetime::Permanent => None,
            Lifetime::Until(date) => Some(date),
        };
        Self {
            time,
            streak: 0,
            last_completed: None,
            category,
            temporary: end_date.is_some(),
            end_date,
        }
    }

    pub fn lifetime(&self) -> Lifetime {
        match (self.temporary, self.end_date) {
            (true, Some(date)) => Lifetime::Until(date),
            _ => Lifetime::Permanent,
        }
    }

    /// A temporary routine expires once `today` is strictly after its end date. A temporary
    /// routine that lost its end date never expires.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        match self.lifetime() {
            Lifetime::Until(end) => today > end,
            Lifetime::Permanent => false,
        }
    }

    pub fn completed_on(&self, day: NaiveDate) -> bool {
        self.last_completed == Some(day)
    }

    /// A routine can be completed from midnight up to its scheduled time, once per day.
    pub fn is_completable(&self, now: NaiveDateTime) -> bool {
        !self.completed_on(now.date()) && now.time() <= self.time
    }

    pub fn mark_completed(&mut self, day: NaiveDate) {
        self.last_completed = Some(day);
        self.streak += 1;
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Lifetime {
    Permanent,
    /// Temporary routine removed after the given day.
    Until(NaiveDate),
}

/// A validated routine produced by [AddRoutineFlow](super::flow::AddRoutineFlow), ready to be
/// inserted into the store.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct NewRoutine {
    pub name: String,
    pub time: NaiveTime,
    pub category: String,
    pub lifetime: Lifetime,
}

impl NewRoutine {
    pub fn into_entity(self) -> (String, RoutineEntity) {
        (
            self.name,
            RoutineEntity::new(self.time, self.category, self.lifetime),
        )
    }
}

mod hh_mm {
    use chrono::NaiveTime;
    use serde::{self, de::Error, Deserialize, Deserializer, Serializer};

    use crate::utils::time::{format_time, TIME_FORMAT};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_time(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, TIME_FORMAT).map_err(D::Error::custom)
    }
}
