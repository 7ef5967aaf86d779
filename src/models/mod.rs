pub mod comment;
pub mod content;
pub mod submission;
