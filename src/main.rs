use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use mailsift::utils::{effective_workers, format_number, setup_logging, validate_args};
use mailsift::{
    read_domains, read_existing_emails, Args, DomainScanner, FetchSettings, Finder, HttpFetcher,
    ScanError, ScanResult, TracingLog,
};

fn run(args: &Args, cancel: Arc<AtomicBool>) -> Result<ScanResult> {
    let mut existing = read_existing_emails(&args.existing)?;
    let domains = read_domains(&args.domains)?;

    let mut settings = FetchSettings {
        scheme: args.scheme.clone(),
        timeout: Duration::from_secs(args.timeout),
        ..FetchSettings::default()
    };
    if let Some(user_agent) = &args.user_agent {
        settings.user_agent = user_agent.clone();
    }
    let scanner = DomainScanner::new(
        HttpFetcher::new(settings).context("Failed to build HTTP client")?,
    );

    let output_path = args.output_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_path)
        .with_context(|| format!("Failed to open output file {:?}", output_path))?;
    let mut sink = BufWriter::new(file);

    let workers = effective_workers(args.workers);
    if workers != args.workers {
        warn!(action = "configure", component = "main", requested = args.workers, workers, "Worker count clamped");
    }

    let result = Finder::new(&scanner)
        .workers(workers)
        .cancel_flag(cancel)
        .run(&domains, &mut sink, &TracingLog, &mut existing);

    match result {
        Ok(result) => Ok(result),
        Err(ScanError::Sink { partial, source }) => {
            print_summary(&partial);
            Err(anyhow::Error::new(source)).with_context(|| {
                format!("Failed to write to output file {:?}", output_path)
            })
        }
        Err(e) => Err(e.into()),
    }
}

fn print_summary(result: &ScanResult) {
    println!("\n--- Scan Summary ---");
    println!("Domains scanned: {}", format_number(result.scanned));
    println!("New emails found: {}", format_number(result.found));
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);
    validate_args(&args)?;

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    }) {
        warn!(action = "configure", component = "main", error = %e, "Could not install Ctrl-C handler");
    }

    match run(&args, cancel.clone()) {
        Ok(result) => {
            if cancel.load(Ordering::SeqCst) {
                info!(action = "cancel", component = "main", "Scan interrupted");
            }
            print_summary(&result);
            Ok(())
        }
        Err(e) => {
            error!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
