//! Helpers for untrusted model output

/// Strip a surrounding markdown code fence (```json ... ```), if any
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") on the opening fence line
    match inner.find('\n') {
        Some(newline) if !inner[..newline].trim().contains(char::is_whitespace) => {
            inner[newline + 1..].trim()
        }
        _ => inner.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_trimmed() {
        assert_eq!(strip_code_fences("  [1, 2]\n"), "[1, 2]");
    }

    #[test]
    fn test_json_fence() {
        assert_eq!(strip_code_fences("```json\n[2, 1]\n```"), "[2, 1]");
    }

    #[test]
    fn test_bare_fence() {
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_unterminated_fence_untouched() {
        assert_eq!(strip_code_fences("```json\n[1]"), "```json\n[1]");
    }
}
