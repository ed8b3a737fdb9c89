pub mod health;
pub mod ready;
pub mod error;
pub mod log;
pub mod editor_files;
pub mod messages;

pub use health::*;
pub use ready::*;
pub use error::*;
pub use log::*;
pub use editor_files::*;
pub use messages::*;
