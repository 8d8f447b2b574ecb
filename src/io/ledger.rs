use std::fs;
use std::path::PathBuf;

use twox_hash::XxHash64;

use crate::calculation::period::DateRange;
use crate::error::Error;
use crate::prelude::*;

const HASH_SEED: u64 = 0;

/// Remembers which (account, period) pairs were already posted.
///
/// There's nothing in the entries, the file name is the record. Only consulted with `--dedup`,
/// so a plain re-run still posts again.
pub struct DeliveryLedger {
    dir: PathBuf,
}

impl DeliveryLedger {
    /// `<user cache dir>/cost-report/delivered`.
    pub fn in_cache_dir() -> AppResult<Self> {
        let dir = dirs::cache_dir()
            .ok_or(Error::CacheDirNotFound)?
            .join("cost-report")
            .join("delivered");

        Ok(Self::at(dir))
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        DeliveryLedger { dir: dir.into() }
    }

    pub fn is_delivered(&self, account: &str, period: &DateRange) -> AppResult<bool> {
        let entry = self.entry_path(account, period);

        entry
            .try_exists()
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to check ledger entry {}", entry.display()))
    }

    /// Call only after every delivery went through.
    pub fn mark_delivered(&self, account: &str, period: &DateRange) -> AppResult<()> {
        // Ensure the directory exists.
        fs::create_dir_all(&self.dir).into_diagnostic()?;

        let entry = self.entry_path(account, period);
        fs::write(&entry, "").into_diagnostic()?;

        tracing::debug!(entry = %entry.display(), "ledger entry written");

        Ok(())
    }

    // private

    fn entry_path(&self, account: &str, period: &DateRange) -> PathBuf {
        self.dir.join(dedup_key(account, period))
    }
}

/// Stable across runs and machines: the same account and period always hash the same.
pub fn dedup_key(account: &str, period: &DateRange) -> String {
    let signature = format!("{}|{}|{}", account, period.start, period.end);

    format!("{:016x}", XxHash64::oneshot(HASH_SEED, signature.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use tempfile::TempDir;

    fn february() -> DateRange {
        DateRange::previous_month(date(2024, 3, 15))
    }

    #[test]
    fn key_depends_on_account_and_period() {
        let february = february();
        let january = DateRange::previous_month(date(2024, 2, 15));

        assert_eq!(dedup_key("prod", &february), dedup_key("prod", &february));
        assert_ne!(dedup_key("prod", &february), dedup_key("dev", &february));
        assert_ne!(dedup_key("prod", &february), dedup_key("prod", &january));
        assert_eq!(dedup_key("prod", &february).len(), 16);
    }

    #[test]
    fn marks_and_finds_deliveries() {
        let scratch = TempDir::new().unwrap();
        let ledger = DeliveryLedger::at(scratch.path().join("delivered"));
        let period = february();

        assert!(!ledger.is_delivered("prod", &period).unwrap());

        ledger.mark_delivered("prod", &period).unwrap();

        assert!(ledger.is_delivered("prod", &period).unwrap());
        assert!(!ledger.is_delivered("dev", &period).unwrap());
    }

    #[test]
    fn marking_twice_is_fine() {
        let scratch = TempDir::new().unwrap();
        let ledger = DeliveryLedger::at(scratch.path().join("delivered"));
        let period = february();

        ledger.mark_delivered("prod", &period).unwrap();
        ledger.mark_delivered("prod", &period).unwrap();

        assert!(ledger.is_delivered("prod", &period).unwrap());
    }
}
