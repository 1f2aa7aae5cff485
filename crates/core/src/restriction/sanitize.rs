//! Input sanitization for settings and request fields.
//!
//! Two flavours, matching how each field is displayed later:
//! - [`sanitize_text_field`] for opaque single-line values (country codes,
//!   search terms): tags stripped, whitespace collapsed.
//! - [`sanitize_rich_text`] for the restriction message, which is rendered
//!   as HTML: only post-content markup survives (`ammonia` allow-list).

/// Strip tags and control characters, collapse whitespace, trim.
#[must_use]
pub fn sanitize_text_field(input: &str) -> String {
    let mut without_tags = String::with_capacity(input.len());
    let mut in_tag = false;

    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c if c.is_control() => without_tags.push(' '),
            c => without_tags.push(c),
        }
    }

    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduce rich text to markup that is safe to render inside a notice.
///
/// Scripts, event handlers, styles and unknown tags are removed; links get
/// `rel="noopener noreferrer"`.
#[must_use]
pub fn sanitize_rich_text(input: &str) -> String {
    ammonia::Builder::default().clean(input).to_string()
}
