pub mod deps;
pub mod humanize;
pub mod logger;

pub use deps::encoder_available;
pub use humanize::{format_duration, format_file_size};
pub use logger::init_logging;
