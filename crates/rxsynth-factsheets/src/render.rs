//! HTML-to-PDF rendering.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use rxsynth_contracts::error::{SynthError, SynthResult};

/// Renders the page at a URL into a PDF file.
pub trait PdfRenderer {
    fn render(&self, url: &str, output: &Path) -> SynthResult<()>;
}

/// Renders through the external `wkhtmltopdf` tool.
#[derive(Debug, Clone)]
pub struct WkHtmlToPdf {
    binary: String,
}

impl WkHtmlToPdf {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for WkHtmlToPdf {
    fn default() -> Self {
        Self::new("wkhtmltopdf")
    }
}

impl PdfRenderer for WkHtmlToPdf {
    fn render(&self, url: &str, output: &Path) -> SynthResult<()> {
        debug!(url, path = %output.display(), "rendering pdf");
        let result = Command::new(&self.binary)
            .arg(url)
            .arg(output)
            .output()
            .map_err(|e| SynthError::RenderFailed {
                url: url.to_string(),
                reason: format!("cannot run '{}': {e}", self.binary),
            })?;

        if !result.status.success() {
            return Err(SynthError::RenderFailed {
                url: url.to_string(),
                reason: format!(
                    "{} ({})",
                    String::from_utf8_lossy(&result.stderr).trim(),
                    result.status
                ),
            });
        }
        Ok(())
    }
}
