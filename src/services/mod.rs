pub mod bus;
pub mod editor_files;
pub mod error_log;
pub mod processor;
