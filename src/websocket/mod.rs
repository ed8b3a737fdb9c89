pub mod handler;
pub mod editor_channel;
pub mod bus_handler;
pub mod worker_handler;
pub mod msg_get_log_handler;
