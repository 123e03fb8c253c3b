pub mod date_format;
pub mod duration;
pub mod serde_helpers;
