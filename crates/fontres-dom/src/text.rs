//! Text Content
//!
//! Visible text extraction and HTML character reference decoding.

use crate::node::format_number;
use crate::{Node, Primitive};

/// Concatenate every text and number leaf in document order
pub fn text_content(node: &Node) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Leaf(Primitive::Text(s)) => out.push_str(s),
        Node::Leaf(Primitive::Number(n)) => out.push_str(&format_number(*n)),
        Node::Leaf(Primitive::Bool(_) | Primitive::Null) => {}
        Node::Element(el) => {
            for child in &el.children {
                collect_text(child, out);
            }
        }
        Node::List(nodes) => {
            for child in nodes {
                collect_text(child, out);
            }
        }
    }
}

/// Decode HTML character references (`&quot;`, `&#39;`, `&#x4E2D;`, ...)
///
/// Unknown or malformed references are left untouched.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        match tail.find(';') {
            // References are short; anything longer is literal text
            Some(semi) if semi <= 10 => {
                match decode_reference(&tail[1..semi]) {
                    Some(ch) => out.push(ch),
                    None => out.push_str(&tail[..=semi]),
                }
                rest = &tail[semi + 1..];
            }
            _ => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_order() {
        let tree = Node::element("div")
            .child(Node::text("Hello "))
            .child(Node::element("b").child(Node::text("big")))
            .child(Node::list(vec![Node::text(" world"), Node::Leaf(Primitive::Number(42.0))]))
            .child(Node::Leaf(Primitive::Bool(true)))
            .child(Node::Leaf(Primitive::Null));

        assert_eq!(text_content(&tree), "Hello big world42");
    }

    #[test]
    fn test_text_content_empty() {
        assert_eq!(text_content(&Node::element("hr")), "");
    }

    #[test]
    fn test_decode_named() {
        assert_eq!(
            decode_entities("font-family: &quot;Inter&quot; &amp; &apos;Roboto&apos;"),
            "font-family: \"Inter\" & 'Roboto'"
        );
    }

    #[test]
    fn test_decode_numeric() {
        assert_eq!(decode_entities("&#39;A&#39; &#x4E2D;"), "'A' \u{4E2D}");
    }

    #[test]
    fn test_decode_passthrough() {
        assert_eq!(decode_entities("no refs"), "no refs");
        assert_eq!(decode_entities("a & b"), "a & b");
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
        assert_eq!(decode_entities("trailing &"), "trailing &");
    }
}
