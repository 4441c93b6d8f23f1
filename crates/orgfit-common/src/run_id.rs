//! Run IDs that tie a shortlist hand-off to the invocation that produced it.
//!
//! By default a process mints one ULID on first use. A caller that already owns a run
//! (a scheduler, the persistence side) can hand its own ULID in instead; [`resolve`]
//! picks between the two.

use once_cell::sync::Lazy;
use ulid::Ulid;

static PROCESS_RUN_ID: Lazy<String> = Lazy::new(|| Ulid::new().to_string());

#[inline]
pub fn get() -> &'static str {
    &PROCESS_RUN_ID
}

#[inline]
pub fn generate() -> String {
    Ulid::new().to_string()
}

/// Canonical (uppercase) form of an externally supplied ULID, or `None` if it is not one.
pub fn parse(raw: &str) -> Option<String> {
    Ulid::from_string(raw.trim()).ok().map(|id| id.to_string())
}

/// External run ID when given, otherwise the process-level one.
///
/// Returns `Err` with the offending input when the external value is not a ULID.
pub fn resolve(external: Option<&str>) -> Result<String, String> {
    match external {
        Some(raw) => parse(raw).ok_or_else(|| raw.to_string()),
        None => Ok(get().to_string()),
    }
}
