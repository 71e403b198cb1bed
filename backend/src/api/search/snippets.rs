//! Snippet ordering for result cards.

use std::collections::{BTreeMap, HashSet};

use common::search_const::{HIGHLIGHT_POST_TAG, HIGHLIGHT_PRE_TAG, MAX_DISPLAYED_SNIPPETS, MAX_SNIPPET_CHARS, SNIPPET_CUT_CHARS};
use common::search_options::SnippetStyle;
use common::search_result::SnippetSpans;

use crate::db_utils::decompose_spans::decompose_snippet;


/// Picks the snippets shown for one hit and splits them into spans.
pub fn snippets_for_display(highlight: &BTreeMap<String, Vec<String>>, style: SnippetStyle) -> Vec<SnippetSpans> {
    rank_snippets(highlight, style)
        .into_iter()
        .take(MAX_DISPLAYED_SNIPPETS)
        .map(|(field, snippet)| SnippetSpans { field, spans: decompose_snippet(&shorten_snippet(&snippet)) })
        .collect()
}

/// Orders `(field, snippet)` pairs.
///
/// `Andlauer` puts first every snippet that brings a highlighted term not seen in an
/// earlier one, so each matched term shows up as early as possible; the others follow
/// in backend order. Terms are compared after [`stem_term`], so "library" and
/// "libraries" count as one. `Default` keeps backend order.
pub fn rank_snippets(highlight: &BTreeMap<String, Vec<String>>, style: SnippetStyle) -> Vec<(String, String)> {
    let all = highlight
        .iter()
        .flat_map(|(field, snippets)| snippets.iter().map(move |snippet| (field.clone(), snippet.clone())))
        .collect::<Vec<_>>();
    if style == SnippetStyle::Default {
        return all;
    }

    let mut covered = HashSet::new();
    let mut ranked = Vec::new();
    let mut remaining = Vec::new();
    for (field, snippet) in all {
        let terms = highlighted_terms(&snippet);
        let brings_new_term = terms.iter().any(|term| !covered.contains(term));
        if brings_new_term {
            covered.extend(terms);
            ranked.push((field, snippet));
        } else {
            remaining.push((field, snippet));
        }
    }
    ranked.extend(remaining);
    ranked
}

/// Stemmed text of every closed highlight in a snippet.
pub fn highlighted_terms(snippet: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut rest = snippet;
    while let Some(start) = rest.find(HIGHLIGHT_PRE_TAG) {
        let after_open = &rest[start + HIGHLIGHT_PRE_TAG.len()..];
        let Some(end) = after_open.find(HIGHLIGHT_POST_TAG) else { break };
        terms.push(stem_term(&after_open[..end]));
        rest = &after_open[end + HIGHLIGHT_POST_TAG.len()..];
    }
    terms
}

/// Lowercases and strips common English inflections from each word. Light suffix
/// rules only, not a full Porter stemmer.
pub fn stem_term(term: &str) -> String {
    term.split_whitespace().map(|word| stem_word(&word.to_lowercase())).collect::<Vec<_>>().join(" ")
}

fn stem_word(word: &str) -> String {
    let len = word.chars().count();
    if len > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if len > 5 && word.ends_with("ing") {
        return word[..word.len() - 3].to_string();
    }
    if len > 4 && word.ends_with("ed") {
        return word[..word.len() - 2].to_string();
    }
    if len > 3 && word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Cuts over-long snippets to the text following their first highlight.
pub fn shorten_snippet(snippet: &str) -> String {
    if snippet.chars().count() <= MAX_SNIPPET_CHARS {
        return snippet.to_string();
    }
    let start = snippet.find(HIGHLIGHT_PRE_TAG).unwrap_or(0);
    let mut cut = snippet[start..].chars().take(SNIPPET_CUT_CHARS).collect::<String>();
    // drop a tag the cut went through
    if let Some(open) = cut.rfind('<') {
        if !cut[open..].contains('>') {
            cut.truncate(open);
        }
    }
    cut
}
