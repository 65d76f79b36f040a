use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Line-oriented progress log for a scan run.
pub trait LogSink: Send + Sync {
    fn write(&self, message: &str);
}

/// Forwards progress lines to the global `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn write(&self, message: &str) {
        info!(component = "scan", "{}", message);
    }
}

/// Collects progress lines in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LogSink for MemoryLog {
    fn write(&self, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn memory_log_keeps_lines_after_a_panicking_writer() {
        let log = Arc::new(MemoryLog::new());
        log.write("before");

        let poisoner = log.clone();
        let _ = thread::spawn(move || {
            let _guard = poisoner.lines.lock().unwrap();
            panic!("writer crashed");
        })
        .join();

        log.write("after");
        assert_eq!(log.lines(), vec!["before", "after"]);
    }
}
