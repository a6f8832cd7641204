// src/utils/html.rs

/// Strips unsafe markup from question text before it is stored.
///
/// Whitelist-based: harmless formatting tags survive, `<script>` (with its
/// content) and event-handler attributes are removed.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_removed_formatting_kept() {
        let cleaned = clean_html("<b>Stop</b><script>alert(1)</script>");
        assert_eq!(cleaned, "<b>Stop</b>");
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(clean_html("Czy wolno wyprzedzać?"), "Czy wolno wyprzedzać?");
    }
}
