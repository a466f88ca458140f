use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base rebrand config directory (~/.config/rebrand/ on all platforms)
pub fn rebrand() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected("APPDATA environment variable not set on Windows")
        })?;
        Ok(PathBuf::from(appdata).join("rebrand"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected("HOME environment variable not set on Unix-like system")
        })?;
        Ok(PathBuf::from(home).join(".config").join("rebrand"))
    }
}

/// Default config file path
pub fn rebrand_json() -> Result<PathBuf> {
    Ok(rebrand()?.join("rebrand.json"))
}
