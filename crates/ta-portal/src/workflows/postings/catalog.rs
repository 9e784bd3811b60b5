use chrono::NaiveTime;

use super::domain::{Posting, PostingId, SlotDay, TutorialSlot};

/// The seeded board of TA postings for the active term.
#[derive(Debug)]
pub struct PostingCatalog {
    postings: Vec<Posting>,
}

impl PostingCatalog {
    pub fn seed() -> Self {
        Self {
            postings: seed_postings(),
        }
    }

    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    pub fn get(&self, id: &PostingId) -> Option<&Posting> {
        self.postings.iter().find(|posting| posting.id == *id)
    }

    /// Fallback identifier used when no professor selection is stored.
    pub fn first_posting_id(&self) -> PostingId {
        self.postings
            .first()
            .map(|posting| posting.id.clone())
            .unwrap_or_else(|| PostingId("p-unassigned".to_string()))
    }

    /// Flip the professor-controlled closed flag. Returns the updated
    /// posting, or `None` when the id is unknown.
    pub fn set_closed(&mut self, id: &PostingId, closed: bool) -> Option<&Posting> {
        let posting = self.postings.iter_mut().find(|posting| posting.id == *id)?;
        posting.closed = closed;
        Some(posting)
    }
}

impl Default for PostingCatalog {
    fn default() -> Self {
        Self::seed()
    }
}

fn slot(day: SlotDay, start: (u32, u32), end: (u32, u32)) -> TutorialSlot {
    TutorialSlot {
        day,
        start: NaiveTime::from_hms_opt(start.0, start.1, 0).expect("valid seed time"),
        end: NaiveTime::from_hms_opt(end.0, end.1, 0).expect("valid seed time"),
    }
}

fn seed_postings() -> Vec<Posting> {
    vec![
        Posting {
            id: PostingId("p-csc209".to_string()),
            course_code: "CSC209".to_string(),
            title: "Software Tools and Systems Programming".to_string(),
            professor: "Prof. Okafor".to_string(),
            prior_grade_hint: "A- or better recommended".to_string(),
            class_time: "Tue/Thu 10:00-11:00".to_string(),
            tutorial_slots: vec![
                slot(SlotDay::Wednesday, (14, 0), (15, 0)),
                slot(SlotDay::Friday, (11, 0), (12, 0)),
            ],
            closed: false,
        },
        Posting {
            id: PostingId("p-csc263".to_string()),
            course_code: "CSC263".to_string(),
            title: "Data Structures and Analysis".to_string(),
            professor: "Prof. Lindqvist".to_string(),
            prior_grade_hint: "B+ or better recommended".to_string(),
            class_time: "Mon/Wed 13:00-14:00".to_string(),
            tutorial_slots: vec![
                slot(SlotDay::Monday, (16, 0), (17, 0)),
                slot(SlotDay::Thursday, (9, 0), (10, 0)),
            ],
            closed: false,
        },
        Posting {
            id: PostingId("p-csc343".to_string()),
            course_code: "CSC343".to_string(),
            title: "Introduction to Databases".to_string(),
            professor: "Prof. Danylenko".to_string(),
            prior_grade_hint: "Completed with B or better".to_string(),
            class_time: "Fri 10:00-12:00".to_string(),
            tutorial_slots: vec![slot(SlotDay::Tuesday, (15, 0), (16, 0))],
            closed: false,
        },
        Posting {
            id: PostingId("p-csc369".to_string()),
            course_code: "CSC369".to_string(),
            title: "Operating Systems".to_string(),
            professor: "Prof. Okafor".to_string(),
            prior_grade_hint: "A recommended, kernel project experience a plus".to_string(),
            class_time: "Mon/Wed/Fri 9:00-10:00".to_string(),
            tutorial_slots: vec![
                slot(SlotDay::Monday, (10, 0), (11, 0)),
                slot(SlotDay::Wednesday, (10, 0), (11, 0)),
            ],
            closed: false,
        },
    ]
}
