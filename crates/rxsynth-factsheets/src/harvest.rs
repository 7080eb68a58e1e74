//! Index-to-PDF harvesting loop.

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use rxsynth_contracts::error::{SynthError, SynthResult};

use crate::{fetch::PageFetcher, links::extract_links, render::PdfRenderer, slug::pdf_file_name};

pub const DEFAULT_INDEX_URL: &str = "https://www.who.int/news-room/fact-sheets";
pub const DEFAULT_LINK_PATTERN: &str = "fact-sheets/detail";
pub const DEFAULT_OUT_DIR: &str = "fact_sheets_pdfs";

/// Where to look and where to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    pub index_url: String,
    pub link_pattern: String,
    pub out_dir: PathBuf,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            link_pattern: DEFAULT_LINK_PATTERN.to_string(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

/// Outcome of one harvest run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    /// Matching links found on the index page.
    pub found: usize,
    /// PDFs written, in link order.
    pub rendered: Vec<PathBuf>,
    /// `(url, reason)` for every link that could not be rendered.
    pub failed: Vec<(String, String)>,
}

impl HarvestReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fetch the index page, then render every matching link into `out_dir`.
///
/// A failed index fetch or an uncreatable output folder aborts the run.
/// Individual render failures are logged and collected in the report.
pub fn harvest<F, R>(config: &HarvestConfig, fetcher: &F, renderer: &R) -> SynthResult<HarvestReport>
where
    F: PageFetcher + ?Sized,
    R: PdfRenderer + ?Sized,
{
    let html = fetcher.fetch(&config.index_url)?;
    let links = extract_links(&html, &config.index_url, &config.link_pattern);
    info!(
        index = %config.index_url,
        pattern = %config.link_pattern,
        found = links.len(),
        "collected fact-sheet links"
    );

    fs::create_dir_all(&config.out_dir).map_err(|e| SynthError::OutputWriteFailed {
        reason: format!("cannot create '{}': {e}", config.out_dir.display()),
    })?;

    let mut report = HarvestReport {
        found: links.len(),
        ..HarvestReport::default()
    };

    for url in links {
        let path = config.out_dir.join(pdf_file_name(&url));
        match renderer.render(&url, &path) {
            Ok(()) => {
                info!(url = %url, path = %path.display(), "saved pdf");
                report.rendered.push(path);
            }
            Err(e) => {
                warn!(url = %url, error = %e, "render failed");
                report.failed.push((url, e.to_string()));
            }
        }
    }

    info!(
        rendered = report.rendered.len(),
        failed = report.failed.len(),
        "harvest complete"
    );
    Ok(report)
}
