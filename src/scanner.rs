use std::time::Instant;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::extract::EmailExtractor;
use crate::fetch::Fetcher;
use crate::log_sink::LogSink;

/// Fetches a domain and extracts candidate addresses from it.
pub struct DomainScanner<F> {
    fetcher: F,
    extractor: EmailExtractor,
}

impl<F: Fetcher> DomainScanner<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            extractor: EmailExtractor::new(),
        }
    }

    /// Candidate addresses for `domain`, empty when the fetch fails.
    pub fn scan(&self, domain: &str, log: &dyn LogSink) -> Vec<String> {
        settle(domain, self.try_scan(domain), log)
    }

    /// Fetch and extract without reporting failures.
    pub fn try_scan(&self, domain: &str) -> Result<Vec<String>, FetchError> {
        let start_time = Instant::now();
        let content = self.fetcher.fetch(domain)?;

        let text = String::from_utf8_lossy(&content);
        let candidates = self.extractor.extract(&text);

        debug!(
            action = "extract",
            component = "scanner",
            domain = domain,
            candidate_count = candidates.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Extracted candidates"
        );
        Ok(candidates)
    }
}

/// Logs a failed fetch and maps it to zero candidates.
pub(crate) fn settle(
    domain: &str,
    outcome: Result<Vec<String>, FetchError>,
    log: &dyn LogSink,
) -> Vec<String> {
    match outcome {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(action = "fetch", component = "scanner", domain = domain, error = %e, "Fetch failed");
            log.write(&format!("failed to fetch {}: {}", domain, e));
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_sink::MemoryLog;

    struct Canned(Result<&'static str, u16>);

    impl Fetcher for Canned {
        fn fetch(&self, _domain: &str) -> Result<Vec<u8>, FetchError> {
            match self.0 {
                Ok(body) => Ok(body.as_bytes().to_vec()),
                Err(code) => Err(FetchError::Status(code)),
            }
        }
    }

    #[test]
    fn extracts_from_fetched_content() {
        let scanner = DomainScanner::new(Canned(Ok("b@example.com, a@example.com")));
        let log = MemoryLog::new();

        assert_eq!(
            scanner.scan("example.com", &log),
            vec!["b@example.com", "a@example.com"]
        );
        assert!(log.lines().is_empty());
    }

    #[test]
    fn fetch_failure_is_logged_and_empty() {
        let scanner = DomainScanner::new(Canned(Err(503)));
        let log = MemoryLog::new();

        assert!(scanner.scan("down.example", &log).is_empty());
        assert_eq!(log.lines(), vec!["failed to fetch down.example: HTTP 503"]);
    }
}
