pub mod comments;
pub mod content;
pub mod counters;
pub mod deletion;
pub mod submissions;
