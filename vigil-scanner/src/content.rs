//! Document-level passes: meta tags, forms, inline scripts
//!
//! All three are pure functions of the parsed document and never read each
//! other's output.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Base64-decode invocation, an obfuscation indicator
static ATOB_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"atob\([^)]+\)").unwrap());

/// Meta tag names that leak stack or authorship information
const LEAKY_META_NAMES: &[&str] = &["generator", "author", "powered-by"];

/// Flag meta tags leaking generator, author or stack information
pub fn analyze_meta(document: &Html) -> Vec<String> {
    let selector = Selector::parse("meta").unwrap();

    let mut leaks = Vec::new();
    for meta in document.select(&selector) {
        let Some(name) = meta.value().attr("name") else {
            continue;
        };
        if LEAKY_META_NAMES.contains(&name) {
            let content = meta.value().attr("content").unwrap_or("");
            leaks.push(format!("{name}: {content}"));
        }
    }
    leaks
}

/// Flag forms with no action attribute or no CSRF marker
///
/// The CSRF check is a substring scan of the serialized form markup, an
/// approximate signal rather than a token parser.
pub fn analyze_forms(document: &Html) -> Vec<String> {
    let selector = Selector::parse("form").unwrap();

    let mut issues = Vec::new();
    for form in document.select(&selector) {
        if form.value().attr("action").unwrap_or("").is_empty() {
            issues.push("Form with no action attribute".to_string());
        }
        if !form.html().to_lowercase().contains("csrf") {
            issues.push("Possible missing CSRF token".to_string());
        }
    }
    issues
}

/// Flag dangerous JavaScript functions and Base64 obfuscation in inline
/// script bodies
pub fn analyze_scripts(document: &Html) -> Vec<String> {
    const SUSPICIOUS_CALLS: &[&str] = &["eval(", "setTimeout(", "new Function"];

    let selector = Selector::parse("script").unwrap();

    let mut suspicious = Vec::new();
    for script in document.select(&selector) {
        let code: String = script.text().collect();
        if SUSPICIOUS_CALLS.iter().any(|call| code.contains(call)) {
            suspicious.push("Suspicious JavaScript function used".to_string());
        }
        if ATOB_REGEX.is_match(&code) {
            suspicious.push("Base64 obfuscation pattern detected".to_string());
        }
    }
    suspicious
}

/// Findings for elements hidden via inline style
///
/// Feeds the honeypot probe, which withholds these when its fetches fail.
pub fn invisible_element_findings(document: &Html) -> Vec<String> {
    let selector = Selector::parse("[style]").unwrap();

    document
        .select(&selector)
        .filter(|el| {
            el.value()
                .attr("style")
                .is_some_and(|style| style.contains("display:none"))
        })
        .map(|_| "Invisible HTML element detected".to_string())
        .collect()
}
