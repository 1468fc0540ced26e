pub mod render;
pub mod session;

pub use render::{write_column_details, write_column_json, write_json, write_summary};
pub use session::{Command, Screen, Session};
