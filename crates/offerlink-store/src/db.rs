use crate::error::Result;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

const BUSY_TIMEOUT_MS: i64 = 2000;

/// Opens the employee directory, creating the file with owner-only access.
pub fn open(path: &Path) -> Result<Connection> {
    create_private_file(path)?;
    let conn = Connection::open(path)?;
    apply_pragmas(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    apply_pragmas(&conn)?;
    Ok(conn)
}

fn apply_pragmas(conn: &Connection) -> Result<()> {
    // Rollback journal: the directory stays a single 0600 file, no -wal/-shm
    // sidecars created with the process umask.
    conn.pragma_update(None, "journal_mode", "DELETE")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    // A scheduled `run` and a manual `employee import` may overlap.
    conn.pragma_update(None, "busy_timeout", BUSY_TIMEOUT_MS)?;
    Ok(())
}

#[cfg(unix)]
fn create_private_file(path: &Path) -> Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    if path.exists() {
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    } else {
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(path)?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn create_private_file(_path: &Path) -> Result<()> {
    Ok(())
}
