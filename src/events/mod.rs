pub mod emitter;
pub mod client;
pub mod worker;

pub use emitter::*;
pub use client::*;
pub use worker::*;
