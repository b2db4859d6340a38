//! Notifier that reports through the tracing pipeline.

use crate::infrastructure::ports::{Notice, NoticeLevel, NotifierPort};

/// Writes user notices to the log. Hosts with a UI supply their own
/// `NotifierPort`.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotifierPort for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => tracing::info!(target: "levelwright_engine::notice", "{}", notice.message),
            NoticeLevel::Warn => tracing::warn!(target: "levelwright_engine::notice", "{}", notice.message),
            NoticeLevel::Error => {
                tracing::error!(target: "levelwright_engine::notice", "{}", notice.message)
            }
        }
    }
}
