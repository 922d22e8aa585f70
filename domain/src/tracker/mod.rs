//! Issue-tracker logic shared by the find-then-act and aggregation tools.
//!
//! - [`matching::find_by_name`] — case-insensitive exact name lookup
//! - [`health::SprintHealth`] — done / in-progress / to-do buckets and completion rate

pub mod health;
pub mod matching;

pub use health::{SprintHealth, StatusCategory, empty_sprint_message};
pub use matching::{Named, find_by_name, names_match};
