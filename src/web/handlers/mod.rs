pub mod analyze;
pub mod summary;
