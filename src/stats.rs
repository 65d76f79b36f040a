use std::collections::HashSet;

/// Addresses already recorded, authoritative for dedup decisions.
pub type EmailSet = HashSet<String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Addresses written to the sink during this run.
    pub found: u32,
    /// Domains a fetch was attempted for, successful or not.
    pub scanned: u32,
}
