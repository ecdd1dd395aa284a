//! Minimal structural parser for caption markup.
//!
//! Both caption formats served by the timedtext endpoints (the legacy `<transcript>`
//! document with `<text start="..">` cues and srv3 `<timedtext>` with `<p t="..">` cues)
//! and the track listing are small, flat XML documents. This parser checks that tags nest
//! properly and records every element in document order together with the raw text of
//! all its descendants. Entity decoding is left to the caller.

use regex::Regex;
use std::sync::OnceLock;

use crate::{Result, TranscriptError};

/// One element of a caption document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Raw (still entity-encoded) text of the element and its descendants
    pub text: String,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r#"^<(/)?([A-Za-z_][\w:.-]*)((?:\s+(?:"[^"]*"|'[^']*'|[^<>"'])*?)?)\s*(/)?>"#)
            .expect("tag pattern is valid")
    })
}

fn attr_regex() -> &'static Regex {
    static ATTR: OnceLock<Regex> = OnceLock::new();
    ATTR.get_or_init(|| {
        Regex::new(r#"([A-Za-z_][\w:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("attribute pattern is valid")
    })
}

fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    attr_regex()
        .captures_iter(raw)
        .map(|cap| {
            let value = cap.get(2).or_else(|| cap.get(3)).map_or("", |m| m.as_str());
            (cap[1].to_string(), value.to_string())
        })
        .collect()
}

/// Length of a construct that carries no elements (comment, declaration, CDATA), if one
/// starts at the beginning of `rest`. CDATA content is returned so it can count as text.
fn skip_special(rest: &str) -> Result<Option<(usize, Option<&str>)>> {
    let (open, close) = if rest.starts_with("<!--") {
        ("<!--", "-->")
    } else if rest.starts_with("<![CDATA[") {
        ("<![CDATA[", "]]>")
    } else if rest.starts_with("<?") {
        ("<?", "?>")
    } else if rest.starts_with("<!") {
        ("<!", ">")
    } else {
        return Ok(None);
    };

    let end = rest[open.len()..]
        .find(close)
        .ok_or_else(|| TranscriptError::MalformedMarkup(format!("unterminated {}", open)))?;
    let body = &rest[open.len()..open.len() + end];
    let consumed = open.len() + end + close.len();

    Ok(Some((consumed, (open == "<![CDATA[").then_some(body))))
}

fn append_text(elements: &mut [Element], open: &[usize], text: &str) {
    if text.is_empty() {
        return;
    }
    for &index in open {
        elements[index].text.push_str(text);
    }
}

/// Parse a caption document into its elements, in document order
pub fn parse(markup: &str) -> Result<Vec<Element>> {
    let mut elements: Vec<Element> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut pos = 0;

    while pos < markup.len() {
        let rest = &markup[pos..];
        let Some(lt) = rest.find('<') else {
            append_text(&mut elements, &open, rest);
            break;
        };

        append_text(&mut elements, &open, &rest[..lt]);
        pos += lt;
        let rest = &markup[pos..];

        if let Some((consumed, cdata)) = skip_special(rest)? {
            if let Some(body) = cdata {
                append_text(&mut elements, &open, body);
            }
            pos += consumed;
            continue;
        }

        let cap = tag_regex().captures(rest).ok_or_else(|| {
            TranscriptError::MalformedMarkup(format!("unexpected '<' at byte {}", pos))
        })?;
        let name = cap[2].to_string();
        let is_close = cap.get(1).is_some();
        let self_closing = cap.get(4).is_some();

        if is_close {
            let index = open.pop().ok_or_else(|| {
                TranscriptError::MalformedMarkup(format!("unexpected closing tag </{}>", name))
            })?;
            if elements[index].name != name {
                return Err(TranscriptError::MalformedMarkup(format!(
                    "mismatched closing tag </{}>, expected </{}>",
                    name, elements[index].name
                )));
            }
        } else {
            elements.push(Element {
                name,
                attributes: parse_attributes(cap.get(3).map_or("", |m| m.as_str())),
                text: String::new(),
            });
            if !self_closing {
                open.push(elements.len() - 1);
            }
        }

        pos += cap[0].len();
    }

    if let Some(&index) = open.last() {
        return Err(TranscriptError::MalformedMarkup(format!(
            "unclosed tag <{}>",
            elements[index].name
        )));
    }

    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_legacy_transcript() {
        let doc = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="2.1">Hello &amp; welcome</text><text start='3' dur="1">again</text></transcript>"#;
        let elements = parse(doc).unwrap();

        let cues: Vec<_> = elements.iter().filter(|e| e.name == "text").collect();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].attr("start"), Some("0.5"));
        assert_eq!(cues[0].text, "Hello &amp; welcome");
        assert_eq!(cues[1].attr("start"), Some("3"));
        assert_eq!(cues[1].attr("missing"), None);
    }

    #[test]
    fn test_nested_spans_accumulate_into_parent() {
        let doc = r#"<timedtext format="3"><body><p t="1200" d="800"><s ac="0">so</s><s t="300"> today</s></p><p t="2000"/></body></timedtext>"#;
        let elements = parse(doc).unwrap();

        let paragraphs: Vec<_> = elements.iter().filter(|e| e.name == "p").collect();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].text, "so today");
        assert_eq!(paragraphs[1].text, "");
    }

    #[test]
    fn test_track_listing() {
        let doc = r#"<transcript_list docid="1"><track id="0" name="" lang_code="de" lang_original="Deutsch"/><track id="1" lang_code="en"/></transcript_list>"#;
        let tracks: Vec<_> = parse(doc)
            .unwrap()
            .into_iter()
            .filter(|e| e.name == "track")
            .collect();
        assert_eq!(tracks[0].attr("lang_code"), Some("de"));
        assert_eq!(tracks[1].attr("lang_code"), Some("en"));
    }

    #[test]
    fn test_comments_and_cdata() {
        let doc = "<transcript><!-- note --><text start=\"1\"><![CDATA[raw]]> text</text></transcript>";
        let elements = parse(doc).unwrap();
        assert_eq!(elements[1].text, "raw text");
    }

    #[test]
    fn test_rejects_structural_errors() {
        for bad in [
            "<transcript><text start=\"1\">hi</transcript>",
            "<transcript><text>hi</text>",
            "</text>",
            "<transcript>< broken</transcript>",
            "<transcript><!-- never closed</transcript>",
        ] {
            assert!(
                matches!(parse(bad), Err(TranscriptError::MalformedMarkup(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_angle_bracket_inside_quoted_attribute() {
        let doc = r#"<transcript><text start="1" n="a>b">hi</text><track note='x>y'/></transcript>"#;
        let elements = parse(doc).unwrap();

        assert_eq!(elements[1].attr("n"), Some("a>b"));
        assert_eq!(elements[1].text, "hi");
        assert_eq!(elements[2].attr("note"), Some("x>y"));
        assert!(matches!(
            parse(r#"<transcript><text n="a>hi</text></transcript>"#),
            Err(TranscriptError::MalformedMarkup(_))
        ));
    }

    #[test]
    fn test_plain_text_has_no_elements() {
        assert!(parse("just words").unwrap().is_empty());
    }
}
