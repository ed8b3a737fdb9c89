use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::services::bus::MessageBus;
use crate::services::editor_files::EditorFiles;
use crate::services::error_log::ErrorLog;
use crate::services::processor::TaskProcessor;

/// Everything the worker process owns, created once at startup.
pub struct AppState {
    pub editor_files: EditorFiles,
    pub error_log: ErrorLog,
    pub bus: MessageBus,
    pub processor: TaskProcessor,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let bus = MessageBus::new(config.bus_capacity);
        let editor_files = EditorFiles::new();
        let error_log = ErrorLog::new(bus.clone(), config.log_settings());
        let processor = TaskProcessor::new();

        error_log.watch(&processor);
        bus.add_handler(Arc::new(error_log.clone()));

        info!(
            "Worker state initialized (log capacity {}, id wrap {})",
            config.max_log_items, config.log_id_wrap
        );
        Self {
            editor_files,
            error_log,
            bus,
            processor,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

