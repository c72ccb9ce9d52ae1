//! FAQ extraction from post body HTML.
//!
//! Single pass over the body: an `<h2>` or `<h3>` heading whose text ends
//! with a question mark opens an entry, and the text of the `<p>` blocks
//! that follow it (up to the next heading) forms the answer. Downstream
//! SEO tooling turns these pairs into FAQ structured data; assembly of
//! that markup is out of scope here.

use serde::Serialize;

/// One extracted question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Extract FAQ pairs from body HTML.
///
/// Deterministic and tolerant of sloppy markup: attributes on headings
/// and paragraphs are ignored, unclosed elements end the scan, and
/// entries whose answers come out empty are dropped.
pub fn extract_faq(html: &str) -> Vec<FaqEntry> {
    let lower = html.to_ascii_lowercase();
    let mut entries = Vec::new();
    let mut cursor = 0;

    while let Some((level, _, body_start)) = next_heading(html, cursor) {
        let close = format!("</h{level}>");
        let Some(rel_end) = lower[body_start..].find(&close) else {
            break;
        };
        let heading_end = body_start + rel_end;
        cursor = heading_end + close.len();

        let question = clean_fragment(&html[body_start..heading_end]);
        if !question.ends_with('?') {
            continue;
        }

        let section_end = next_heading(html, cursor)
            .map(|(_, start, _)| start)
            .unwrap_or(html.len());
        let answer = paragraph_text(&html[cursor..section_end]);
        if !answer.is_empty() {
            entries.push(FaqEntry { question, answer });
        }
    }

    entries
}

/// Find the next `<h2`/`<h3` opening tag at or after `from`.
///
/// Returns `(level, tag_start, content_start)`.
fn next_heading(html: &str, from: usize) -> Option<(u8, usize, usize)> {
    let lower = html[from..].to_ascii_lowercase();
    let mut best: Option<(u8, usize)> = None;
    for level in [2u8, 3u8] {
        let needle = format!("<h{level}");
        let mut search = 0;
        while let Some(rel) = lower[search..].find(&needle) {
            let pos = search + rel;
            // Must be a real tag boundary: `<h2>` or `<h2 ...>`.
            match lower.as_bytes().get(pos + needle.len()) {
                Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') => {
                    if best.map_or(true, |(_, b)| pos < b) {
                        best = Some((level, pos));
                    }
                    break;
                }
                _ => search = pos + needle.len(),
            }
        }
    }
    let (level, rel_start) = best?;
    let tag_start = from + rel_start;
    let content_start = html[tag_start..].find('>').map(|i| tag_start + i + 1)?;
    Some((level, tag_start, content_start))
}

/// Collect and join the text of every `<p>` block in `html`.
fn paragraph_text(html: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let mut parts = Vec::new();
    let mut cursor = 0;
    while let Some(rel) = lower[cursor..].find("<p") {
        let pos = cursor + rel;
        match lower.as_bytes().get(pos + 2) {
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') => {}
            _ => {
                cursor = pos + 2;
                continue;
            }
        }
        let Some(open_end) = lower[pos..].find('>').map(|i| pos + i + 1) else {
            break;
        };
        let Some(close_rel) = lower[open_end..].find("</p>") else {
            break;
        };
        let close = open_end + close_rel;
        let text = clean_fragment(&html[open_end..close]);
        if !text.is_empty() {
            parts.push(text);
        }
        cursor = close + 4;
    }
    parts.join(" ")
}

/// Strip tags, decode the common entities, and collapse whitespace.
fn clean_fragment(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_question_and_answer() {
        let html = "<h2>What is a spark?</h2><p>A short daily post.</p>";
        let entries = extract_faq(html);
        assert_eq!(
            entries,
            vec![FaqEntry {
                question: "What is a spark?".to_string(),
                answer: "A short daily post.".to_string(),
            }]
        );
    }

    #[test]
    fn test_non_question_headings_skipped() {
        let html = "<h2>Introduction</h2><p>Welcome.</p>\
                    <h3>Can I subscribe?</h3><p>Yes, via the newsletter.</p>";
        let entries = extract_faq(html);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].question, "Can I subscribe?");
    }

    #[test]
    fn test_answer_spans_multiple_paragraphs_until_next_heading() {
        let html = "<h2>How does ranking work?</h2>\
                    <p>Tags weigh most.</p><p>Recency breaks ties.</p>\
                    <h2>Another section</h2><p>Ignored.</p>";
        let entries = extract_faq(html);
        assert_eq!(entries[0].answer, "Tags weigh most. Recency breaks ties.");
    }

    #[test]
    fn test_inline_tags_stripped_and_entities_decoded() {
        let html = "<h3 class=\"faq\">Cats &amp; dogs?</h3>\
                    <p>Both are <strong>welcome</strong>&nbsp;here.</p>";
        let entries = extract_faq(html);
        assert_eq!(entries[0].question, "Cats & dogs?");
        assert_eq!(entries[0].answer, "Both are welcome here.");
    }

    #[test]
    fn test_empty_answers_dropped() {
        let html = "<h2>Orphan question?</h2><h2>Real one?</h2><p>Answered.</p>";
        let entries = extract_faq(html);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].question, "Real one?");
    }

    #[test]
    fn test_plain_text_body_yields_nothing() {
        assert!(extract_faq("Just a paragraph of text with a question? mark.").is_empty());
    }
}
