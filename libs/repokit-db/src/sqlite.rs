//! `SQLite` DSN helpers.

use std::path::Path;

use crate::Result;

/// `true` for in-memory DSNs (`sqlite::memory:`, `sqlite://:memory:`, `mode=memory`).
pub fn is_memory_dsn(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

/// File path portion of a `SQLite` DSN, without scheme and query string.
fn file_path(dsn: &str) -> Option<&str> {
    let rest = dsn.strip_prefix("sqlite:")?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split_once('?').map_or(rest, |(p, _)| p);
    (!path.is_empty()).then_some(path)
}

/// Ensure the parent directory of a file DSN exists and that sqlx creates the
/// file if missing. In-memory DSNs pass through untouched.
pub fn prepare_sqlite_path(dsn: &str, create_dirs: bool) -> Result<String> {
    if is_memory_dsn(dsn) {
        return Ok(dsn.to_owned());
    }
    let Some(path) = file_path(dsn) else {
        return Ok(dsn.to_owned());
    };
    if create_dirs
        && let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }
    if dsn.contains("mode=") {
        Ok(dsn.to_owned())
    } else if dsn.contains('?') {
        Ok(format!("{dsn}&mode=rwc"))
    } else {
        Ok(format!("{dsn}?mode=rwc"))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn memory_dsns_pass_through() {
        assert_eq!(prepare_sqlite_path("sqlite::memory:", true).unwrap(), "sqlite::memory:");
        assert!(is_memory_dsn("sqlite://file.db?mode=memory"));
        assert!(!is_memory_dsn("sqlite://file.db"));
    }

    #[test]
    fn file_dsn_creates_parent_and_requests_rwc() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested/dir/app.db");
        let dsn = format!("sqlite://{}", db.display());

        let prepared = prepare_sqlite_path(&dsn, true).unwrap();

        assert_eq!(prepared, format!("{dsn}?mode=rwc"));
        assert!(dir.path().join("nested/dir").is_dir());
    }

    #[test]
    fn keeps_explicit_mode() {
        let dsn = "sqlite://app.db?mode=ro";
        assert_eq!(prepare_sqlite_path(dsn, false).unwrap(), dsn);
    }
}
