//!  Everything the application keeps on disk lives in one application directory:
//!   - `routines.json` with the whole routine mapping, rewritten on every save.
//!   - `activity_log.txt`, an append-only human readable history of changes.
//!   - `logs/` with diagnostics.

pub mod activity_log;
pub mod routine_storage;

pub const ROUTINES_FILE: &str = "routines.json";
pub const ACTIVITY_LOG_FILE: &str = "activity_log.txt";
pub const LOGS_DIR: &str = "logs";
