use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;

const MARKER_PATTERNS: [&str; 6] = [
    "sk-",
    "Authorization: Bearer ",
    "authorization: bearer ",
    "api_key=",
    "\"api_key\":\"",
    "\"access_token\":\"",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

fn token_end(input: &str, from: usize) -> usize {
    let mut end = from;
    for (i, c) in input[from..].char_indices() {
        if is_secret_char(c) {
            end = from + i + c.len_utf8();
        } else {
            break;
        }
    }
    end
}

fn scrub_after_marker(scrubbed: &mut String, marker: &str) {
    let mut search_from = 0;
    loop {
        let Some(rel) = scrubbed[search_from..].find(marker) else {
            break;
        };

        let start = search_from + rel;
        let content_start = start + marker.len();
        let end = token_end(scrubbed, content_start);

        // Skip bare markers without a token value.
        if end == content_start {
            search_from = content_start;
            continue;
        }

        scrubbed.replace_range(start..end, "[REDACTED]");
        search_from = start + "[REDACTED]".len();
    }
}

/// Scrub known secret-like token patterns from provider error strings so a
/// key never leaks into logs or the console.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    if !MARKER_PATTERNS.iter().any(|p| input.contains(p)) {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in MARKER_PATTERNS {
        scrub_after_marker(&mut scrubbed, marker);
    }
    Cow::Owned(scrubbed)
}

/// Sanitize API error text by scrubbing secrets and truncating length.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);

    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed.into_owned();
    }

    let scrubbed = scrubbed.as_ref();
    let mut end = MAX_API_ERROR_CHARS;
    while end > 0 && !scrubbed.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &scrubbed[..end])
}

/// Build a sanitized provider error from a failed HTTP response.
pub async fn api_error(provider: &str, response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
    let sanitized = sanitize_api_error(&body);
    anyhow::anyhow!("{provider} API error ({status}): {sanitized}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrubs_bearer_token() {
        let input = "request failed: Authorization: Bearer sk-abc123DEF was rejected";
        let out = scrub_secret_patterns(input);
        assert!(!out.contains("sk-abc123DEF"));
        assert!(out.contains("[REDACTED]"));
    }

    #[test]
    fn scrubs_key_prefix() {
        let out = scrub_secret_patterns("invalid key sk-proj-9f9f9f provided");
        assert!(!out.contains("sk-proj-9f9f9f"));
    }

    #[test]
    fn clean_input_borrows_unchanged() {
        let input = "plain error with no secrets";
        assert!(matches!(
            scrub_secret_patterns(input),
            Cow::Borrowed(s) if s == input
        ));
    }

    #[test]
    fn sanitize_truncates_long_bodies() {
        let long = "x".repeat(500);
        let out = sanitize_api_error(&long);
        assert!(out.len() <= MAX_API_ERROR_CHARS + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn bare_marker_without_token_is_kept() {
        let input = "ends with api_key=";
        assert_eq!(scrub_secret_patterns(input).as_ref(), input);
    }
}
