use std::path::{Path, PathBuf};

/// Resolve the user's home directory, or error if unset.
pub fn home_dir() -> anyhow::Result<PathBuf> {
    std::env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| anyhow::anyhow!("HOME environment variable is not set"))
}

/// Create the data directory if missing, owner-only on unix.
pub fn ensure_data_dir(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(path)?;
    set_secure_dir_permissions(path)
}

#[cfg(unix)]
fn set_secure_dir_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
}

#[cfg(not(unix))]
fn set_secure_dir_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
