pub mod jwt;
pub mod reading_time;
pub mod slug;
pub mod validation;
