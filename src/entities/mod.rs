pub mod tag;
pub mod time_entry;
pub mod user;
pub mod workspace;
