//! Column profiling for delimited text files.
//!
//! The loader in [`services::file_processor`] turns raw bytes into a
//! [`Dataset`](services::analysis::Dataset), the engine in
//! [`services::analysis`] profiles every column, and [`presenter`] renders
//! the resulting [`FileSummary`](services::analysis::FileSummary).

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod presenter;
pub mod services;
