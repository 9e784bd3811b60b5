use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for course postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostingId(pub String);

impl fmt::Display for PostingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl SlotDay {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
        }
    }
}

/// One tutorial block the TA would run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialSlot {
    pub day: SlotDay,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A course's TA position listing, owned by one professor.
///
/// Postings are seed data: never created or deleted at runtime. The
/// `closed` flag is the only mutable field and is professor-controlled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Posting {
    pub id: PostingId,
    pub course_code: String,
    pub title: String,
    pub professor: String,
    pub prior_grade_hint: String,
    pub class_time: String,
    pub tutorial_slots: Vec<TutorialSlot>,
    pub closed: bool,
}
