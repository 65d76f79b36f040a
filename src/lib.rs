pub mod args;
pub mod domain;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod finder;
pub mod loader;
pub mod log_sink;
pub mod scanner;
pub mod stats;
pub mod utils;

pub use args::Args;
pub use error::{FetchError, ScanError};
pub use fetch::{FetchSettings, Fetcher, HttpFetcher};
pub use finder::{find_emails, Finder};
pub use loader::{read_domains, read_existing_emails};
pub use log_sink::{LogSink, MemoryLog, TracingLog};
pub use scanner::DomainScanner;
pub use stats::{EmailSet, ScanResult};
