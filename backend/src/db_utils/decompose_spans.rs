//! Splits highlighted snippets into plain and highlighted spans.

use common::search_const::{HIGHLIGHT_POST_TAG, HIGHLIGHT_PRE_TAG};
use common::text_highlight::HighlightTextSpan;

pub fn decompose_snippet(snippet: &str) -> Vec<HighlightTextSpan> {
    let mut spans = split_on_tags(snippet.trim());
    let mut index = 0;
    for span in spans.iter_mut().filter(|span| span.is_highlighted) {
        span.index = index;
        index += 1;
    }
    spans
}

fn split_on_tags(text: &str) -> Vec<HighlightTextSpan> {
    if text.is_empty() {
        return vec![];
    }
    if !text.contains(HIGHLIGHT_PRE_TAG) {
        return vec![HighlightTextSpan::plain(text)];
    }

    let mut spans: Vec<HighlightTextSpan> = Vec::new();
    let mut buffer = String::new();
    // nested highlight tags stay highlighted until the outermost one closes
    let mut depth: usize = 0;
    let mut i: usize = 0;

    while i < text.len() {
        let next_open = text[i..].find(HIGHLIGHT_PRE_TAG).map(|p| p + i);
        let next_close = text[i..].find(HIGHLIGHT_POST_TAG).map(|p| p + i);
        let (is_open, pos) = match (next_open, next_close) {
            (None, None) => break,
            (Some(op), None) => (true, op),
            (None, Some(cp)) => (false, cp),
            (Some(op), Some(cp)) => if op < cp { (true, op) } else { (false, cp) },
        };

        buffer.push_str(&text[i..pos]);
        push_span(&mut spans, &mut buffer, depth > 0);

        if is_open {
            depth += 1;
            i = pos + HIGHLIGHT_PRE_TAG.len();
        } else if depth > 0 {
            depth -= 1;
            i = pos + HIGHLIGHT_POST_TAG.len();
        } else {
            // stray closer: keep it as text
            buffer.push_str(HIGHLIGHT_POST_TAG);
            i = pos + HIGHLIGHT_POST_TAG.len();
        }
    }

    if i < text.len() {
        buffer.push_str(&text[i..]);
    }
    // an unclosed opener highlights the rest of the snippet
    push_span(&mut spans, &mut buffer, depth > 0);
    spans
}

/// Moves the buffer into a new span, or onto the previous one when the highlight state matches.
fn push_span(spans: &mut Vec<HighlightTextSpan>, buffer: &mut String, highlighted: bool) {
    if buffer.is_empty() {
        return;
    }
    if let Some(last) = spans.last_mut() {
        if last.is_highlighted == highlighted {
            last.text.push_str(buffer);
            buffer.clear();
            return;
        }
    }
    spans.push(HighlightTextSpan { text: std::mem::take(buffer), is_highlighted: highlighted, index: 0 });
}


#[cfg(test)]
mod tests {
    use super::*;

    fn texts(spans: &[HighlightTextSpan]) -> Vec<(&str, bool)> {
        spans.iter().map(|span| (span.text.as_str(), span.is_highlighted)).collect()
    }

    #[test]
    fn plain_snippet_is_one_span() {
        let spans = decompose_snippet("we used a tool");
        assert_eq!(texts(&spans), vec![("we used a tool", false)]);
    }

    #[test]
    fn highlighted_terms_are_numbered() {
        let spans = decompose_snippet("analysis with <strong>pandas</strong> and <strong>numpy</strong>.");
        assert_eq!(
            texts(&spans),
            vec![("analysis with ", false), ("pandas", true), (" and ", false), ("numpy", true), (".", false)]
        );
        assert_eq!(spans[1].index, 0);
        assert_eq!(spans[3].index, 1);
    }

    #[test]
    fn stray_closer_is_text_and_unclosed_opener_highlights_rest() {
        let spans = decompose_snippet("a</strong> b <strong>c d");
        assert_eq!(texts(&spans), vec![("a</strong> b ", false), ("c d", true)]);
    }

    #[test]
    fn empty_snippet_has_no_spans() {
        assert!(decompose_snippet("   ").is_empty());
    }
}
