//! Minimal text/markdown to HTML conversion for the outbound mail body.
//! Handles exactly what generated posts contain: line breaks, headings,
//! bold/italic emphasis and hashtags. Anything that already looks like HTML
//! is passed through untouched.

/// True when the body appears to be pre-rendered HTML.
pub fn looks_like_html(body: &str) -> bool {
    body.contains("<html") || body.contains("<body")
}

/// Convert a post body to an HTML document. Input that already looks like
/// HTML is returned unmodified.
pub fn render_html(body: &str) -> String {
    if looks_like_html(body) {
        return body.to_string();
    }

    let mut out = String::from("<html><body>\n");
    for line in body.lines() {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            out.push_str("<br>\n");
        } else if let Some(heading) = trimmed.strip_prefix("## ") {
            out.push_str(&format!("<h2>{}</h2>\n", render_inline(heading)));
        } else if let Some(heading) = trimmed.strip_prefix("# ") {
            out.push_str(&format!("<h1>{}</h1>\n", render_inline(heading)));
        } else {
            out.push_str(&render_inline(trimmed));
            out.push_str("<br>\n");
        }
    }
    out.push_str("</body></html>\n");
    out
}

fn render_inline(line: &str) -> String {
    let escaped = escape(line);
    let bolded = paired_replace(&escaped, "**", "<strong>", "</strong>");
    let emphasized = paired_replace(&bolded, "*", "<em>", "</em>");
    link_hashtags(&emphasized)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Replace `marker`-delimited pairs with open/close tags. An unmatched
/// trailing marker is left as-is.
fn paired_replace(text: &str, marker: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let Some(start) = rest.find(marker) else {
            out.push_str(rest);
            break;
        };
        let after_open = &rest[start + marker.len()..];
        let Some(end) = after_open.find(marker) else {
            out.push_str(rest);
            break;
        };

        // An empty pair is not emphasis; emit the marker literally.
        if end == 0 {
            out.push_str(&rest[..start + marker.len()]);
            rest = after_open;
            continue;
        }

        out.push_str(&rest[..start]);
        out.push_str(open);
        out.push_str(&after_open[..end]);
        out.push_str(close);
        rest = &after_open[end + marker.len()..];
    }
    out
}

/// Turn `#hashtag` tokens into LinkedIn hashtag-feed links.
fn link_hashtags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    let mut last_emitted = 0;

    while let Some((idx, c)) = chars.next() {
        if c != '#' {
            continue;
        }
        // Only at start of a word.
        let at_word_start = text[..idx]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);
        if !at_word_start {
            continue;
        }

        let tag: String = text[idx + 1..]
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if tag.is_empty() {
            continue;
        }

        out.push_str(&text[last_emitted..idx]);
        out.push_str(&format!(
            "<a href=\"https://www.linkedin.com/feed/hashtag/?keyword={tag}\">#{tag}</a>"
        ));
        last_emitted = idx + 1 + tag.len();
        while chars.peek().is_some_and(|(i, _)| *i < last_emitted) {
            chars.next();
        }
    }
    out.push_str(&text[last_emitted..]);
    out
}
