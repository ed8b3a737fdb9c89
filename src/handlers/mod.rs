pub mod health;
pub mod log;
pub mod editor_files;
pub mod not_found;

pub use health::*;
pub use log::*;
pub use editor_files::*;
pub use not_found::*;
