//! # rxsynth-factsheets
//!
//! Harvests public drug and disease fact sheets as PDFs, as reference
//! material for building and reviewing the drug catalog.
//!
//! The run is: fetch an index page, collect the `<a href>` links matching a
//! pattern, and render each linked page to a PDF in an output folder. The
//! network and the renderer sit behind [`PageFetcher`] and [`PdfRenderer`]
//! so the loop can run without either.
//!
//! ```rust,ignore
//! use rxsynth_factsheets::{harvest, CurlFetcher, HarvestConfig, WkHtmlToPdf};
//!
//! let report = harvest(&HarvestConfig::default(), &CurlFetcher::default(), &WkHtmlToPdf::default())?;
//! println!("{} of {} saved", report.rendered.len(), report.found);
//! ```

pub mod fetch;
pub mod harvest;
pub mod links;
pub mod render;
pub mod slug;

pub use fetch::{CurlFetcher, PageFetcher};
pub use harvest::{harvest, HarvestConfig, HarvestReport};
pub use links::{extract_links, resolve_href};
pub use render::{PdfRenderer, WkHtmlToPdf};
pub use slug::pdf_file_name;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use rxsynth_contracts::error::{SynthError, SynthResult};

    use super::*;

    const BASE: &str = "https://www.who.int/news-room/fact-sheets";

    const INDEX: &str = r##"
        <html><body>
          <nav><a href="#main">Skip</a><abbr title="World Health Organization">WHO</abbr></nav>
          <ul>
            <li><a class="link" href="/news-room/fact-sheets/detail/malaria">Malaria</a></li>
            <li><A HREF='/news-room/fact-sheets/detail/asthma'>Asthma</A></li>
            <li><a href=/news-room/fact-sheets/detail/diabetes>Diabetes</a></li>
            <li><a href="/news-room/fact-sheets/detail/malaria">Malaria again</a></li>
            <li><a data-href="fact-sheets/detail/decoy" href="/about">About</a></li>
            <li><a href="mailto:media@who.int?subject=fact-sheets/detail">Mail</a></li>
          </ul>
        </body></html>
    "##;

    struct StaticPage(&'static str);

    impl PageFetcher for StaticPage {
        fn fetch(&self, _url: &str) -> SynthResult<String> {
            Ok(self.0.to_string())
        }
    }

    struct Offline;

    impl PageFetcher for Offline {
        fn fetch(&self, url: &str) -> SynthResult<String> {
            Err(SynthError::FetchFailed {
                url: url.to_string(),
                reason: "network unreachable".to_string(),
            })
        }
    }

    /// Writes a stub PDF, failing for any URL that contains `fail_on`.
    struct StubRenderer {
        fail_on: &'static str,
    }

    impl PdfRenderer for StubRenderer {
        fn render(&self, url: &str, output: &Path) -> SynthResult<()> {
            if url.contains(self.fail_on) {
                return Err(SynthError::RenderFailed {
                    url: url.to_string(),
                    reason: "page timed out".to_string(),
                });
            }
            fs::write(output, b"%PDF-1.4\n").map_err(|e| SynthError::OutputWriteFailed {
                reason: e.to_string(),
            })
        }
    }

    fn temp_out_dir() -> PathBuf {
        std::env::temp_dir().join(format!("rxsynth-factsheets-{}", uuid::Uuid::new_v4()))
    }

    // ── Link extraction ───────────────────────────────────────────────────────

    #[test]
    fn test_extract_links_filters_resolves_and_dedups() {
        let links: Vec<String> = extract_links(INDEX, BASE, "fact-sheets/detail")
            .into_iter()
            .collect();

        assert_eq!(
            links,
            vec![
                "https://www.who.int/news-room/fact-sheets/detail/asthma",
                "https://www.who.int/news-room/fact-sheets/detail/diabetes",
                "https://www.who.int/news-room/fact-sheets/detail/malaria",
            ]
        );
    }

    #[test]
    fn test_extract_links_skips_fragments_even_when_matching() {
        let html = r##"<a href="#fact-sheets/detail">top</a>"##;
        assert!(extract_links(html, BASE, "fact-sheets/detail").is_empty());
    }

    #[test]
    fn test_extract_links_decodes_ampersands() {
        let html = r#"<a href="/fact-sheets/detail/x?lang=en&amp;print=1">x</a>"#;
        let links = extract_links(html, BASE, "fact-sheets/detail");
        assert!(links.contains("https://www.who.int/fact-sheets/detail/x?lang=en&print=1"));
    }

    #[test]
    fn test_resolve_href_forms() {
        assert_eq!(
            resolve_href(BASE, "https://example.org/a").as_deref(),
            Some("https://example.org/a")
        );
        assert_eq!(
            resolve_href(BASE, "//cdn.who.int/a").as_deref(),
            Some("https://cdn.who.int/a")
        );
        assert_eq!(
            resolve_href(BASE, "/a/b").as_deref(),
            Some("https://www.who.int/a/b")
        );
        assert_eq!(
            resolve_href(BASE, "detail/malaria").as_deref(),
            Some("https://www.who.int/news-room/detail/malaria")
        );
        assert_eq!(
            resolve_href("https://www.who.int", "detail/malaria").as_deref(),
            Some("https://www.who.int/detail/malaria")
        );
        assert_eq!(resolve_href(BASE, "mailto:media@who.int"), None);
        assert_eq!(resolve_href(BASE, "javascript:void(0)"), None);
    }

    // ── File names ────────────────────────────────────────────────────────────

    #[test]
    fn test_pdf_file_name_uses_last_segment() {
        assert_eq!(
            pdf_file_name("https://www.who.int/news-room/fact-sheets/detail/malaria"),
            "malaria.pdf"
        );
        assert_eq!(
            pdf_file_name("https://www.who.int/news-room/fact-sheets/detail/hepatitis-b/?x=1#top"),
            "hepatitis-b.pdf"
        );
    }

    #[test]
    fn test_pdf_file_name_falls_back_to_full_path() {
        assert_eq!(
            pdf_file_name("https://www.who.int/news-room/fact-sheets/detail"),
            "news-room_fact-sheets_detail.pdf"
        );
    }

    #[test]
    fn test_pdf_file_name_sanitizes_and_defaults() {
        assert_eq!(pdf_file_name("https://www.who.int/a/b%20c.html"), "b20chtml.pdf");
        assert_eq!(pdf_file_name("https://www.who.int/"), "page.pdf");
        assert_eq!(pdf_file_name("https://www.who.int/%%%"), "page.pdf");
    }

    // ── Harvest loop ──────────────────────────────────────────────────────────

    #[test]
    fn test_harvest_renders_links_and_collects_failures() {
        let config = HarvestConfig {
            index_url: BASE.to_string(),
            out_dir: temp_out_dir(),
            ..HarvestConfig::default()
        };

        let report = harvest(&config, &StaticPage(INDEX), &StubRenderer { fail_on: "asthma" }).unwrap();

        assert_eq!(report.found, 3);
        assert_eq!(
            report.rendered,
            vec![
                config.out_dir.join("diabetes.pdf"),
                config.out_dir.join("malaria.pdf"),
            ]
        );
        assert!(report.rendered.iter().all(|p| p.exists()));
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].0.ends_with("/asthma"));
        assert!(report.failed[0].1.contains("page timed out"));
        assert!(!report.is_complete());

        fs::remove_dir_all(&config.out_dir).unwrap();
    }

    #[test]
    fn test_harvest_with_no_links_still_creates_folder() {
        let config = HarvestConfig {
            out_dir: temp_out_dir(),
            ..HarvestConfig::default()
        };

        let report = harvest(&config, &StaticPage("<p>nothing here</p>"), &StubRenderer { fail_on: "" }).unwrap();

        assert_eq!(report, HarvestReport::default());
        assert!(report.is_complete());
        assert!(config.out_dir.is_dir());

        fs::remove_dir_all(&config.out_dir).unwrap();
    }

    #[test]
    fn test_index_fetch_failure_is_fatal() {
        let config = HarvestConfig {
            out_dir: temp_out_dir(),
            ..HarvestConfig::default()
        };

        let err = harvest(&config, &Offline, &StubRenderer { fail_on: "" }).unwrap_err();

        assert!(matches!(err, SynthError::FetchFailed { .. }));
        assert!(!config.out_dir.exists());
    }

    // ── External tools ────────────────────────────────────────────────────────

    #[test]
    fn test_missing_curl_binary_is_fetch_failure() {
        let fetcher = CurlFetcher::new("rxsynth-no-such-curl");
        let err = fetcher.fetch(BASE).unwrap_err();
        match err {
            SynthError::FetchFailed { url, reason } => {
                assert_eq!(url, BASE);
                assert!(reason.contains("rxsynth-no-such-curl"));
            }
            other => panic!("expected FetchFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_renderer_binary_is_render_failure() {
        let renderer = WkHtmlToPdf::new("rxsynth-no-such-wkhtmltopdf");
        let out = temp_out_dir().join("x.pdf");
        let err = renderer.render(BASE, &out).unwrap_err();
        assert!(matches!(err, SynthError::RenderFailed { .. }));
        assert!(!out.exists());
    }
}
