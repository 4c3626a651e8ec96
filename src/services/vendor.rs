//! LCSC vendor catalog client
//!
//! Fetches the product-detail page for a part code and extracts the
//! descriptive fields used to enrich scanned records. Extraction is
//! deliberately shallow (a handful of compiled regexes over the spec table);
//! the enrichment contract is best-effort and every failure degrades to an
//! empty result.

use crate::config::Config;
use crate::error::Result;
use crate::types::VendorInfo;
use async_trait::async_trait;
use regex::Regex;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0";

/// Enrichment gateway: part code → supplementary descriptive fields.
///
/// Implementations must never raise; a fetch that fails for any reason
/// returns an empty [`VendorInfo`].
#[async_trait]
pub trait VendorCatalog: Send + Sync {
    async fn fetch_part_info(&self, part_code: &str) -> VendorInfo;
}

/// Vendor catalog backed by LCSC product-detail pages.
pub struct LcscCatalog {
    http: reqwest::Client,
    base_url: String,
    row_re: Regex,
    cell_re: Regex,
    tag_re: Regex,
    price_row_re: Regex,
    meta_desc_re: Regex,
}

impl LcscCatalog {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.vendor_base_url.trim_end_matches('/').to_string(),
            row_re: regex(r"(?s)<tr[^>]*>(.*?)</tr>"),
            cell_re: regex(r"(?s)<td[^>]*>(.*?)</td>"),
            tag_re: regex(r"<[^>]+>"),
            price_row_re: regex(r#"(?s)<tr[^>]*class="[^"]*major2--text[^"]*"[^>]*>(.*?)</tr>"#),
            meta_desc_re: regex(r#"<meta\s+name="description"\s+content="([^"]*)""#),
        })
    }

    fn product_url(&self, part_code: &str) -> String {
        format!("{}/product-detail/{}.html", self.base_url, part_code)
    }

    async fn fetch(&self, part_code: &str) -> Result<VendorInfo> {
        let url = self.product_url(part_code);
        tracing::debug!(part_code = %part_code, url = %url, "Fetching vendor page");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                part_code = %part_code,
                status = status.as_u16(),
                "Vendor page returned non-success status"
            );
            return Ok(VendorInfo::default());
        }

        let html = response.text().await?;
        Ok(self.extract(&html))
    }

    /// Pull the known spec-table fields out of the page HTML.
    fn extract(&self, html: &str) -> VendorInfo {
        let mut info = VendorInfo::default();

        for row in self.row_re.captures_iter(html) {
            let cells: Vec<String> = self
                .cell_re
                .captures_iter(&row[1])
                .map(|c| self.cell_text(&c[1]))
                .collect();
            if cells.len() < 2 || cells[1].is_empty() {
                continue;
            }
            let (key, value) = (&cells[0], cells[1].clone());
            if key.contains("Manufacturer") {
                info.manufacturer.get_or_insert(value);
            } else if key.contains("Mfr. Part") {
                info.mfr_part_number.get_or_insert(value);
            } else if key.contains("Package") {
                info.package.get_or_insert(value);
            } else if key.contains("Description") {
                info.description.get_or_insert(value);
            }
        }

        info.unit_price = self.extract_unit_price(html);

        if info.description.is_none() {
            info.description = self
                .meta_desc_re
                .captures(html)
                .map(|c| c[1].trim().to_string())
                .filter(|d| !d.is_empty());
        }

        info
    }

    /// Unit price from the second cell of the highlighted price-table row.
    fn extract_unit_price(&self, html: &str) -> Option<f64> {
        let row = self.price_row_re.captures(html)?;
        let cells: Vec<String> = self
            .cell_re
            .captures_iter(&row[1])
            .map(|c| self.cell_text(&c[1]))
            .collect();
        let raw = cells.get(1)?;
        raw.replace(['$', ','], "").trim().parse().ok()
    }

    fn cell_text(&self, cell_html: &str) -> String {
        self.tag_re.replace_all(cell_html, "").trim().to_string()
    }
}

#[async_trait]
impl VendorCatalog for LcscCatalog {
    async fn fetch_part_info(&self, part_code: &str) -> VendorInfo {
        match self.fetch(part_code).await {
            Ok(info) => {
                if info.is_empty() {
                    tracing::info!(part_code = %part_code, "No vendor info found");
                } else {
                    tracing::info!(
                        part_code = %part_code,
                        manufacturer = info.manufacturer.as_deref().unwrap_or("-"),
                        package = info.package.as_deref().unwrap_or("-"),
                        "Vendor info retrieved"
                    );
                }
                info
            }
            Err(e) => {
                tracing::warn!(part_code = %part_code, error = %e, "Vendor fetch failed");
                VendorInfo::default()
            }
        }
    }
}

/// Patterns are compile-time constants; a failure to parse one is a bug.
fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Cli, Config};

    fn catalog() -> LcscCatalog {
        let config = Config::resolve(&Cli::default()).unwrap();
        LcscCatalog::new(&config).unwrap()
    }

    const SAMPLE_PAGE: &str = r#"
        <table>
          <tr><td>Manufacturer</td><td><a href="/x">Texas Instruments</a></td></tr>
          <tr><td>Mfr. Part #</td><td>NE555DR</td></tr>
          <tr><td>Package</td><td>SOIC-8</td></tr>
          <tr><td>Description</td><td>Single precision timer</td></tr>
        </table>
        <table class="priceTable"><tbody>
          <tr class="major2--text"><td>10+</td><td>$0.0820</td></tr>
        </tbody></table>
    "#;

    #[test]
    fn extracts_spec_table_fields() {
        let info = catalog().extract(SAMPLE_PAGE);
        assert_eq!(info.manufacturer.as_deref(), Some("Texas Instruments"));
        assert_eq!(info.mfr_part_number.as_deref(), Some("NE555DR"));
        assert_eq!(info.package.as_deref(), Some("SOIC-8"));
        assert_eq!(info.description.as_deref(), Some("Single precision timer"));
        assert_eq!(info.unit_price, Some(0.082));
    }

    #[test]
    fn meta_description_is_the_fallback() {
        let html = r#"<meta name="description" content="555 timer IC">"#;
        let info = catalog().extract(html);
        assert_eq!(info.description.as_deref(), Some("555 timer IC"));
    }

    #[test]
    fn unrecognized_page_yields_empty_info() {
        assert!(catalog().extract("<html><body>nothing</body></html>").is_empty());
    }

    #[test]
    fn product_url_shape() {
        assert_eq!(
            catalog().product_url("C123456"),
            "https://www.lcsc.com/product-detail/C123456.html"
        );
    }
}
