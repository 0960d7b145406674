/// Escape a value for interpolation into HTML text or attribute content.
/// Team, player and league fields come from an external backend and are
/// treated as untrusted.
pub fn escape(s: &str) -> String {
    // '&' first, so already-produced entities are not double-escaped
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
