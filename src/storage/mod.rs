pub mod database;
pub mod identity;

pub use identity::IdentityStore;

use std::fs;
use std::path::Path;

/// Ensure the parent directory of the database file exists.
pub fn ensure_data_dir(db_path: &str) -> std::io::Result<()> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
