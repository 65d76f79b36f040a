use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mailsift",
    about = "Scan domains for email addresses and append newly found ones to a list",
    version,
    long_about = None
)]
pub struct Args {
    /// File with one domain per line
    #[arg(short, long, default_value = "domains.txt")]
    pub domains: PathBuf,

    /// File with previously found email addresses
    #[arg(short, long, default_value = "emails.txt")]
    pub existing: PathBuf,

    /// File new addresses are appended to (defaults to --existing)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of domains fetched concurrently
    #[arg(short, long, default_value_t = 1)]
    pub workers: usize,

    /// Per-domain fetch timeout in seconds
    #[arg(short, long, default_value_t = 15)]
    pub timeout: u64,

    /// URL scheme used to reach each domain's root page
    #[arg(long, default_value = "https")]
    pub scheme: String,

    /// User-Agent header sent with each request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn output_path(&self) -> &PathBuf {
        self.output.as_ref().unwrap_or(&self.existing)
    }
}
