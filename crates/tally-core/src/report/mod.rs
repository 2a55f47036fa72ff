pub mod console;
pub mod markdown;
pub mod summary;

pub use summary::{write_summary, Rejection, Summary, SummaryAction, REJECTION_REASON};
