use rayon::prelude::*;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::{FetchError, ScanError};
use crate::fetch::Fetcher;
use crate::log_sink::LogSink;
use crate::scanner::{settle, DomainScanner};
use crate::stats::{EmailSet, ScanResult};

/// Scans `domains` in order, appending unseen addresses to `sink`.
pub fn find_emails<F: Fetcher, W: Write>(
    domains: &[String],
    sink: &mut W,
    log: &dyn LogSink,
    existing: &mut EmailSet,
    scanner: &DomainScanner<F>,
) -> Result<ScanResult, ScanError> {
    Finder::new(scanner).run(domains, sink, log, existing)
}

/// Merges candidates into the existing set. Sole owner of the sink for a run.
struct Accumulator<'a, W> {
    sink: &'a mut W,
    log: &'a dyn LogSink,
    existing: &'a mut EmailSet,
    result: ScanResult,
}

impl<'a, W: Write> Accumulator<'a, W> {
    fn new(sink: &'a mut W, log: &'a dyn LogSink, existing: &'a mut EmailSet) -> Self {
        Self {
            sink,
            log,
            existing,
            result: ScanResult::default(),
        }
    }

    fn accumulate(&mut self, domain: &str, candidates: Vec<String>) -> io::Result<()> {
        let mut new_for_domain = 0u32;

        for email in candidates {
            if self.existing.contains(&email) {
                continue;
            }
            // Flushed before insertion so a failed write leaves no orphan in the set,
            // even behind a buffered writer.
            writeln!(self.sink, "{}", email)?;
            self.sink.flush()?;
            self.log.write(&format!("found {} on {}", email, domain));
            self.existing.insert(email);
            self.result.found += 1;
            new_for_domain += 1;
        }

        self.log
            .write(&format!("scanned {}: {} new", domain, new_for_domain));
        Ok(())
    }

    fn fail(self, source: io::Error) -> ScanError {
        self.log.write(&format!(
            "aborted after {} domains, {} new emails: {}",
            self.result.scanned, self.result.found, source
        ));
        ScanError::Sink {
            partial: self.result,
            source,
        }
    }

    fn finish(self, total: usize, cancelled: bool) -> ScanResult {
        if cancelled {
            self.log.write(&format!(
                "scan cancelled after {} of {} domains, {} new emails",
                self.result.scanned, total, self.result.found
            ));
        } else {
            self.log.write(&format!(
                "done: {} domains scanned, {} new emails",
                self.result.scanned, self.result.found
            ));
        }
        self.result
    }
}

pub struct Finder<'a, F> {
    scanner: &'a DomainScanner<F>,
    workers: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a, F: Fetcher> Finder<'a, F> {
    pub fn new(scanner: &'a DomainScanner<F>) -> Self {
        Self {
            scanner,
            workers: 1,
            cancel: None,
        }
    }

    /// Number of domains fetched concurrently. `1` scans sequentially.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Stops the run between domains once `flag` is set.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub fn run<W: Write>(
        &self,
        domains: &[String],
        sink: &mut W,
        log: &dyn LogSink,
        existing: &mut EmailSet,
    ) -> Result<ScanResult, ScanError> {
        if domains.is_empty() {
            return Ok(ScanResult::default());
        }

        let start_time = Instant::now();
        info!(
            action = "start",
            component = "finder",
            domain_count = domains.len(),
            known_emails = existing.len(),
            workers = self.workers,
            "Starting scan"
        );

        let result = if self.workers > 1 && domains.len() > 1 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()
            {
                Ok(pool) => self.run_concurrent(&pool, domains, sink, log, existing),
                Err(e) => {
                    warn!(action = "configure", component = "finder", error = %e, "Worker pool unavailable, scanning sequentially");
                    self.run_sequential(domains, sink, log, existing)
                }
            }
        } else {
            self.run_sequential(domains, sink, log, existing)
        };

        if let Ok(result) = &result {
            info!(
                action = "complete",
                component = "finder",
                scanned = result.scanned,
                found = result.found,
                duration_ms = start_time.elapsed().as_millis(),
                "Scan completed"
            );
        }
        result
    }

    fn run_sequential<W: Write>(
        &self,
        domains: &[String],
        sink: &mut W,
        log: &dyn LogSink,
        existing: &mut EmailSet,
    ) -> Result<ScanResult, ScanError> {
        let mut acc = Accumulator::new(sink, log, existing);

        for domain in domains {
            if self.is_cancelled() {
                return Ok(acc.finish(domains.len(), true));
            }

            acc.result.scanned += 1;
            let candidates = self.scanner.scan(domain, log);
            if let Err(e) = acc.accumulate(domain, candidates) {
                return Err(acc.fail(e));
            }
        }

        Ok(acc.finish(domains.len(), false))
    }

    /// Fetches on `pool` while the calling thread applies results in input order.
    fn run_concurrent<W: Write>(
        &self,
        pool: &rayon::ThreadPool,
        domains: &[String],
        sink: &mut W,
        log: &dyn LogSink,
        existing: &mut EmailSet,
    ) -> Result<ScanResult, ScanError> {
        type Outcome = Option<Result<Vec<String>, FetchError>>;

        let stop = AtomicBool::new(false);
        let (tx, rx) = mpsc::channel::<(usize, Outcome)>();

        thread::scope(|s| {
            let stop = &stop;
            s.spawn(move || {
                pool.install(|| {
                    domains
                        .par_iter()
                        .enumerate()
                        .for_each_with(tx, |tx, (index, domain)| {
                            let outcome = if stop.load(Ordering::SeqCst) || self.is_cancelled() {
                                None
                            } else {
                                Some(self.scanner.try_scan(domain))
                            };
                            // The writer hangs up once it stops consuming.
                            let _ = tx.send((index, outcome));
                        });
                });
            });

            let mut acc = Accumulator::new(sink, log, existing);
            let mut pending: BTreeMap<usize, Outcome> = BTreeMap::new();
            let mut next = 0usize;

            for (index, outcome) in rx {
                pending.insert(index, outcome);

                while let Some(outcome) = pending.remove(&next) {
                    let outcome = match outcome {
                        Some(outcome) if !self.is_cancelled() => outcome,
                        _ => {
                            stop.store(true, Ordering::SeqCst);
                            return Ok(acc.finish(domains.len(), true));
                        }
                    };

                    let domain = &domains[next];
                    next += 1;
                    acc.result.scanned += 1;
                    let candidates = settle(domain, outcome, log);
                    if let Err(e) = acc.accumulate(domain, candidates) {
                        stop.store(true, Ordering::SeqCst);
                        return Err(acc.fail(e));
                    }
                }
            }

            Ok(acc.finish(domains.len(), false))
        })
    }
}
