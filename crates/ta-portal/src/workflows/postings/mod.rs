pub mod applications;

mod catalog;
pub mod domain;

pub use catalog::PostingCatalog;
pub use domain::{Posting, PostingId, SlotDay, TutorialSlot};
