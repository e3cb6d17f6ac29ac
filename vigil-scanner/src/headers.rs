//! Response header analysis
//!
//! Flags tech-stack-revealing headers and missing hardening headers.

use reqwest::header::HeaderMap;

pub fn analyze_headers(headers: &HeaderMap) -> Vec<String> {
    let mut issues = Vec::new();

    if let Some(server) = headers.get("server") {
        let value = server.to_str().unwrap_or("[invalid header value]");
        issues.push(format!("Server info leaked: {value}"));
    }
    if let Some(powered_by) = headers.get("x-powered-by") {
        let value = powered_by.to_str().unwrap_or("[invalid header value]");
        issues.push(format!("Tech stack leaked: {value}"));
    }
    if !headers.contains_key("strict-transport-security") {
        issues.push("Missing HSTS header".to_string());
    }
    if !headers.contains_key("content-security-policy") {
        issues.push("Missing CSP header".to_string());
    }
    if !headers.contains_key("x-frame-options") {
        issues.push("Missing X-Frame-Options header".to_string());
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_response_flags_everything() {
        let mut headers = HeaderMap::new();
        headers.insert("server", "nginx/1.18.0".parse().unwrap());
        headers.insert("x-powered-by", "PHP/7.4".parse().unwrap());

        let issues = analyze_headers(&headers);
        assert_eq!(issues.len(), 5);
        assert!(issues.contains(&"Server info leaked: nginx/1.18.0".to_string()));
        assert!(issues.contains(&"Tech stack leaked: PHP/7.4".to_string()));
        assert!(issues.contains(&"Missing HSTS header".to_string()));
    }

    #[test]
    fn test_hardened_response_is_clean() {
        let mut headers = HeaderMap::new();
        headers.insert("strict-transport-security", "max-age=63072000".parse().unwrap());
        headers.insert("content-security-policy", "default-src 'self'".parse().unwrap());
        headers.insert("x-frame-options", "DENY".parse().unwrap());

        assert!(analyze_headers(&headers).is_empty());
    }
}
