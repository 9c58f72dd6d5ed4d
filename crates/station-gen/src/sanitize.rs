/// Turns free-form model output into an IRC-safe nickname: whitespace becomes
/// `_`, then anything outside `[A-Za-z0-9_-]` is dropped. May return empty.
pub fn sanitize_nickname(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(sanitize_nickname("Glitch King"), "Glitch_King");
        assert_eq!(sanitize_nickname("a\tb\nc"), "a_b_c");
    }

    #[test]
    fn punctuation_is_dropped() {
        assert_eq!(sanitize_nickname("Cyber.Ninja!"), "CyberNinja");
        assert_eq!(sanitize_nickname("\"Echo-Sphere\""), "Echo-Sphere");
        assert_eq!(sanitize_nickname("Zoë"), "Zo");
    }

    #[test]
    fn nothing_usable_yields_empty() {
        assert_eq!(sanitize_nickname("!!!"), "");
        assert_eq!(sanitize_nickname(""), "");
    }
}
