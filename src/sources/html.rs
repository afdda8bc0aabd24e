//! Minimal HTML slicing for listing cards.
//!
//! Job boards ship deeply nested, frequently changing markup; we only ever
//! need a handful of labeled text fragments per card, so this is plain
//! case-insensitive substring slicing, not a DOM. Anything that does not
//! match simply yields `None` and the card is skipped upstream.

/// Case-insensitive `find` starting at `from`. ASCII-only lowering keeps
/// byte offsets valid in the original string.
pub fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
        .map(|i| from + i)
}

/// Split a document into card segments: each segment runs from one occurrence
/// of `marker` to the next (or to the end of the document).
pub fn card_segments<'a>(doc: &'a str, marker: &str) -> Vec<&'a str> {
    let mut starts = Vec::new();
    let mut pos = 0;
    while let Some(i) = find_ci(doc, marker, pos) {
        starts.push(i);
        pos = i + marker.len();
    }

    let mut segments = Vec::with_capacity(starts.len());
    for (n, &start) in starts.iter().enumerate() {
        let end = starts.get(n + 1).copied().unwrap_or(doc.len());
        segments.push(&doc[start..end]);
    }
    segments
}

/// Text content of the first element whose opening tag contains
/// `open_marker`, up to `close_tag`. Tags stripped, entities decoded,
/// whitespace collapsed.
pub fn tag_text(segment: &str, open_marker: &str, close_tag: &str) -> Option<String> {
    let open = find_ci(segment, open_marker, 0)?;
    let body_start = find_ci(segment, ">", open)? + 1;
    let body_end = find_ci(segment, close_tag, body_start)?;
    let text = normalize_ws(&strip_tags(&decode_entities(&segment[body_start..body_end])));
    if text.is_empty() { None } else { Some(text) }
}

/// `href` attribute of the first anchor whose tag contains `anchor_marker`.
pub fn href_after(segment: &str, anchor_marker: &str) -> Option<String> {
    let anchor = find_ci(segment, anchor_marker, 0)?;
    let tag_end = find_ci(segment, ">", anchor)?;
    let href = find_ci(segment, "href=\"", anchor)?;
    if href > tag_end {
        return None;
    }
    let value_start = href + "href=\"".len();
    let value_end = find_ci(segment, "\"", value_start)?;
    let value = decode_entities(&segment[value_start..value_end]);
    if value.is_empty() { None } else { Some(value) }
}

pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

pub fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
