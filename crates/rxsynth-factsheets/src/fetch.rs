//! Page fetching.

use std::process::Command;

use tracing::debug;

use rxsynth_contracts::error::{SynthError, SynthResult};

/// Browser-like User-Agent; some sites refuse obvious scripts.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Retrieves the HTML body of a page.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> SynthResult<String>;
}

/// Fetches pages by running `curl`.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    binary: String,
}

impl CurlFetcher {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for CurlFetcher {
    fn default() -> Self {
        Self::new("curl")
    }
}

impl PageFetcher for CurlFetcher {
    fn fetch(&self, url: &str) -> SynthResult<String> {
        debug!(url, binary = %self.binary, "fetching page");
        let output = Command::new(&self.binary)
            .args(["--fail", "--silent", "--show-error", "--location"])
            .args(["--user-agent", USER_AGENT])
            .arg(url)
            .output()
            .map_err(|e| SynthError::FetchFailed {
                url: url.to_string(),
                reason: format!("cannot run '{}': {e}", self.binary),
            })?;

        if !output.status.success() {
            return Err(SynthError::FetchFailed {
                url: url.to_string(),
                reason: format!(
                    "{} ({})",
                    String::from_utf8_lossy(&output.stderr).trim(),
                    output.status
                ),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
