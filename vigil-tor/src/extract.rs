//! Per-engine result extraction
//!
//! One extractor per engine isolates that engine's markup quirks behind a
//! common capability. Extractors never fail on malformed input: absent
//! fields degrade to the documented defaults.

use scraper::{ElementRef, Html, Selector};

use vigil_core::{ExtractorKind, ResultRecord, NO_DESCRIPTION, NO_TITLE};

/// Turns one engine's result markup into ordered result records
pub trait ResultExtractor: Send + Sync {
    fn extract(&self, html: &str) -> Vec<ResultRecord>;
}

/// Resolve the extractor implementation for a registry tag
pub fn extractor_for(kind: ExtractorKind) -> &'static dyn ResultExtractor {
    match kind {
        ExtractorKind::Tordex => &TordexExtractor,
        ExtractorKind::Tor66 => &Tor66Extractor,
    }
}

/// Concatenated, trimmed text of an element
fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Tordex lists results as `div.result` blocks: `h5` title, `h6 > a` link,
/// `p` description
pub struct TordexExtractor;

impl ResultExtractor for TordexExtractor {
    fn extract(&self, html: &str) -> Vec<ResultRecord> {
        let document = Html::parse_document(html);
        let block_selector = Selector::parse("div.result").unwrap();
        let title_selector = Selector::parse("h5").unwrap();
        let link_selector = Selector::parse("h6 a").unwrap();
        let desc_selector = Selector::parse("p").unwrap();

        let mut records = Vec::new();
        for block in document.select(&block_selector) {
            let title = block
                .select(&title_selector)
                .next()
                .map(element_text)
                .unwrap_or_else(|| NO_TITLE.to_string());
            let url = block
                .select(&link_selector)
                .next()
                .map(element_text)
                .unwrap_or_default();
            let description = block
                .select(&desc_selector)
                .next()
                .map(element_text)
                .unwrap_or_else(|| NO_DESCRIPTION.to_string());

            records.push(ResultRecord::new(title, url, description));
        }
        records
    }
}

/// Tor66 wraps outbound links in a `url.php?u=` redirect and puts each
/// description in the text node following the anchor's next `<br>`
pub struct Tor66Extractor;

impl ResultExtractor for Tor66Extractor {
    fn extract(&self, html: &str) -> Vec<ResultRecord> {
        let document = Html::parse_document(html);
        let anchor_selector = Selector::parse("a[href]").unwrap();

        let mut records = Vec::new();
        for anchor in document.select(&anchor_selector) {
            let href = match anchor.value().attr("href") {
                Some(h) => h,
                None => continue,
            };
            if !href.contains("url.php?u=") || !href.contains(".onion") {
                continue;
            }

            let target = href
                .split("url.php?u=")
                .nth(1)
                .and_then(|rest| rest.split('&').next())
                .unwrap_or_default();

            let text = element_text(anchor);
            let title = if text.is_empty() {
                NO_TITLE.to_string()
            } else {
                text
            };

            let description =
                description_after(anchor).unwrap_or_else(|| NO_DESCRIPTION.to_string());

            records.push(ResultRecord::new(title, target, description));
        }
        records
    }
}

/// Non-empty text immediately following the anchor's next `<br>` sibling
fn description_after(anchor: ElementRef) -> Option<String> {
    use scraper::node::Node;

    let br = anchor
        .next_siblings()
        .find(|node| matches!(node.value(), Node::Element(el) if el.name() == "br"))?;
    let after = br.next_sibling()?;
    match after.value() {
        Node::Text(t) => {
            let trimmed = t.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tordex_extracts_blocks() {
        let html = r##"
            <html><body>
                <div class="result">
                    <h5>Hidden Wiki Mirror</h5>
                    <h6><a href="#">http://wiki1234567890abcdef.onion</a></h6>
                    <p>A community-edited index.</p>
                </div>
                <div class="result">
                    <h5>Forum</h5>
                    <h6><a href="#">http://forum1234567890abcde.onion/board</a></h6>
                    <p>Discussion board.</p>
                </div>
            </body></html>
        "##;

        let records = TordexExtractor.extract(html);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Hidden Wiki Mirror");
        assert_eq!(records[0].url, "http://wiki1234567890abcdef.onion");
        assert_eq!(records[0].description, "A community-edited index.");
        assert_eq!(records[0].domain(), "wiki1234567890abcdef.onion");
        assert_eq!(records[1].domain(), "forum1234567890abcde.onion");
    }

    #[test]
    fn test_tordex_defaults_for_missing_fields() {
        let html = r#"<div class="result"><span>nothing useful</span></div>"#;

        let records = TordexExtractor.extract(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, NO_TITLE);
        assert_eq!(records[0].url, "");
        assert_eq!(records[0].description, NO_DESCRIPTION);
        assert_eq!(records[0].domain(), "Unknown");
    }

    #[test]
    fn test_tor66_unwraps_redirect_urls() {
        let html = r#"
            <html><body>
                <a href="url.php?u=http://market1234567890abcd.onion/&rank=1">Market</a><br>
                Escrow marketplace, est. 2021.
                <a href="/internal/about">About</a>
                <a href="url.php?u=http://paste1234567890abcdef.onion">Paste</a><br>
            </body></html>
        "#;

        let records = Tor66Extractor.extract(html);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Market");
        assert_eq!(records[0].url, "http://market1234567890abcd.onion/");
        assert_eq!(records[0].description, "Escrow marketplace, est. 2021.");
        assert_eq!(records[1].description, NO_DESCRIPTION);
    }

    #[test]
    fn test_tor66_skips_non_wrapper_anchors() {
        let html = r#"
            <a href="http://direct1234567890abcde.onion/">Direct</a>
            <a href="url.php?u=http://example.com/clearnet">Clearnet</a>
        "#;

        let records = Tor66Extractor.extract(html);
        assert!(records.is_empty());
    }

    #[test]
    fn test_extractors_tolerate_malformed_markup() {
        let html = "<div class=\"result\"><h5>Unclosed<h6><a>url.php?u=";
        let _ = TordexExtractor.extract(html);
        let _ = Tor66Extractor.extract(html);
    }
}
