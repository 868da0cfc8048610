pub mod error;
pub mod media;
pub mod uploads;
