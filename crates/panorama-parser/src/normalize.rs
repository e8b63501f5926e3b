use crate::transliterate::ascii_fold;

/// Maps arbitrary header text to a canonical, identifier-safe form:
/// accents folded to ASCII, trimmed, lowercased, `%` spelled out as `pct`,
/// and every run of other punctuation/whitespace collapsed to a single
/// underscore. Pure and total; identical inputs always yield identical
/// output, and an already-canonical identifier passes through unchanged.
pub fn canonical_ident(raw: &str) -> String {
    let folded = ascii_fold(raw);
    let expanded = folded.trim().to_ascii_lowercase().replace('%', "pct");

    let mut out = String::with_capacity(expanded.len());
    let mut pending_sep = false;
    for ch in expanded.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch);
        } else {
            pending_sep = true;
        }
    }
    out
}
