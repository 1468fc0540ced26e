pub mod analysis;
pub mod file_processor;
