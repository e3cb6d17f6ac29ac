//! Cookie attribute analysis

use vigil_tor::SetCookie;

/// Flag cookies missing the Secure flag or the HttpOnly attribute
///
/// One finding per missing attribute per cookie.
pub fn analyze_cookies(cookies: &[SetCookie]) -> Vec<String> {
    let mut issues = Vec::new();
    for cookie in cookies {
        if !cookie.secure {
            issues.push(format!("{} missing Secure flag", cookie.name));
        }
        if !cookie.http_only {
            issues.push(format!("{} missing HttpOnly", cookie.name));
        }
    }
    issues
}
