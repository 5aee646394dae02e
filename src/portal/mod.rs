pub mod catalog;
pub mod deadlines;
pub mod schedule;

pub use catalog::{build_lecture_catalog, list_simple_files, list_subfolders};
pub use deadlines::classify_deadlines;
pub use schedule::generate_schedule;
