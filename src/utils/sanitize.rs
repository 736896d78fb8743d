//! Utilities for sanitizing error messages.
//!
//! Removes control characters from messages before they are written into
//! error records, and truncates them to keep output lines bounded.

/// Sanitizes an error message by removing control characters.
///
/// Newlines, tabs and carriage returns are kept; other characters below 0x20
/// are dropped. Non-ASCII text is preserved.
pub fn sanitize_error_message(message: &str) -> String {
    message
        .chars()
        .filter(|c| {
            let code = *c as u32;
            code >= 0x20 // Printable ASCII starts at 0x20 (space)
                || code == 0x09 // Tab
                || code == 0x0A // Newline
                || code == 0x0D // Carriage return
        })
        .collect()
}

/// Sanitizes and truncates an error message to `MAX_ERROR_MESSAGE_LENGTH` characters.
///
/// A truncated message ends with a note carrying the original length.
pub fn sanitize_and_truncate_error_message(message: &str) -> String {
    let sanitized = sanitize_error_message(message);
    let char_count = sanitized.chars().count();

    if char_count > crate::config::MAX_ERROR_MESSAGE_LENGTH {
        // Leave room for the truncation note
        let keep = crate::config::MAX_ERROR_MESSAGE_LENGTH.saturating_sub(50);
        let head: String = sanitized.chars().take(keep).collect();
        format!("{head}... (truncated, original length: {char_count} chars)")
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_error_message_removes_control_chars() {
        let input = "Error\x00message\x01with\x02control\x03chars";
        assert_eq!(sanitize_error_message(input), "Errormessagewithcontrolchars");
    }

    #[test]
    fn test_sanitize_error_message_preserves_newlines_and_tabs() {
        let input = "Error\nmessage\twith\r\nwhitespace";
        assert_eq!(sanitize_error_message(input), input);
    }

    #[test]
    fn test_sanitize_error_message_preserves_unicode() {
        let input = "Error message with unicode: 测试 🚀";
        assert_eq!(sanitize_error_message(input), input);
    }

    #[test]
    fn test_truncate_long_message_on_char_boundary() {
        let input = "é".repeat(crate::config::MAX_ERROR_MESSAGE_LENGTH + 10);
        let output = sanitize_and_truncate_error_message(&input);
        assert!(output.contains("truncated, original length: 2010 chars"));
        assert!(output.starts_with("éé"));
    }

    #[test]
    fn test_short_message_untouched() {
        assert_eq!(sanitize_and_truncate_error_message("HTTP status 429"), "HTTP status 429");
    }
}
