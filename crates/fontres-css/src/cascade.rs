//! Style Cascade
//!
//! Walks a styled tree depth-first (pre-order), computing the effective font
//! properties of every element and recording each distinct
//! (family, weight, style) combination in force where a family applies.

use std::collections::HashSet;

use fontres_dom::{decode_entities, Element, Node, PropValue};
use fontres_text::{FontRequest, FontWeight, RequestKey};

use crate::computed::ComputedStyle;
use crate::CssError;

/// Font request extraction over a document tree
#[derive(Debug, Default)]
pub struct CascadeResolver {
    requests: Vec<FontRequest>,
    seen: HashSet<RequestKey>,
    elements: usize,
}

impl CascadeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the font requests of `root`, in first-seen traversal order.
    ///
    /// A malformed `style` anywhere aborts the whole walk.
    pub fn resolve(mut self, root: &Node) -> Result<Vec<FontRequest>, CssError> {
        self.visit(root, &ComputedStyle::default())?;
        tracing::debug!(
            "Cascade visited {} elements, {} font requests",
            self.elements,
            self.requests.len()
        );
        Ok(self.requests)
    }

    fn visit(&mut self, node: &Node, inherited: &ComputedStyle) -> Result<(), CssError> {
        match node {
            Node::Leaf(_) => Ok(()),
            Node::List(nodes) => {
                for child in nodes {
                    self.visit(child, inherited)?;
                }
                Ok(())
            }
            Node::Element(element) => {
                self.elements += 1;
                // Children inherit the filtered style, quoted sets included
                let computed = element_style(element)?.inherit(inherited);
                self.emit(&computed);

                for child in &element.children {
                    self.visit(child, &computed)?;
                }
                Ok(())
            }
        }
    }

    fn emit(&mut self, computed: &ComputedStyle) {
        let Some(families) = &computed.font_families else {
            return;
        };

        let weight = FontWeight::nearest(computed.weight_or_default() as f32);
        let italic = computed.is_italic();

        for family in families {
            let request = FontRequest {
                family: family.clone(),
                weight: Some(weight.value()),
                italic,
            };
            if self.seen.insert(request.key()) {
                self.requests.push(request);
            }
        }
    }
}

/// Own style of an element: font attributes, then `style` declarations on top
pub fn element_style(element: &Element) -> Result<ComputedStyle, CssError> {
    let attributes = ComputedStyle::from_attributes(&element.props);

    let declared = match element.props.style() {
        None | Some(PropValue::Null) => return Ok(attributes),
        Some(PropValue::Text(css)) => ComputedStyle::from_inline(&decode_entities(css)),
        Some(PropValue::Map(decls)) => {
            ComputedStyle::from_declarations(decls.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        }
        Some(other) => {
            return Err(CssError::MalformedStyle {
                tag: element.tag.clone(),
                found: kind_of(other),
            });
        }
    };

    Ok(attributes.overlay(&declared))
}

fn kind_of(value: &PropValue) -> &'static str {
    match value {
        PropValue::Text(_) => "string",
        PropValue::Number(_) => "number",
        PropValue::Bool(_) => "boolean",
        PropValue::Null => "null",
        PropValue::Map(_) => "mapping",
    }
}

/// Extract the font requests declared by a styled tree
pub fn extract_font_requests(root: &Node) -> Result<Vec<FontRequest>, CssError> {
    CascadeResolver::new().resolve(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn families(requests: &[FontRequest]) -> Vec<&str> {
        requests.iter().map(|r| r.family.as_str()).collect()
    }

    #[test]
    fn test_quoted_family_requested() {
        let tree = Node::element("div").style("font-family: 'Arial'");
        let requests = extract_font_requests(&tree).unwrap();
        assert_eq!(requests, vec![FontRequest::new("Arial").weight(400)]);
    }

    #[test]
    fn test_unquoted_family_ignored() {
        let tree = Node::element("div").style("font-family: Arial");
        assert!(extract_font_requests(&tree).unwrap().is_empty());
    }

    #[test]
    fn test_descendants_inherit_family() {
        let tree = Node::element("div")
            .style("font-family: 'Inter'")
            .child(Node::element("section").child(Node::element("p").child(Node::text("deep"))));

        let requests = extract_font_requests(&tree).unwrap();
        assert_eq!(requests, vec![FontRequest::new("Inter").weight(400)]);
    }

    #[test]
    fn test_inherited_family_takes_child_weight() {
        let tree = Node::element("div")
            .style("font-family: 'Inter'")
            .child(Node::element("b").style("font-weight: bold"))
            .child(Node::element("i").style("font-style: italic"));

        let requests = extract_font_requests(&tree).unwrap();
        assert_eq!(
            requests,
            vec![
                FontRequest::new("Inter").weight(400),
                FontRequest::new("Inter").weight(700),
                FontRequest::new("Inter").weight(400).italic(),
            ]
        );
    }

    #[test]
    fn test_unquoted_override_keeps_ancestor_family() {
        let tree = Node::element("div")
            .style("font-family: 'Inter'")
            .child(Node::element("span").style("font-family: Arial; font-weight: 600"));

        let requests = extract_font_requests(&tree).unwrap();
        assert_eq!(families(&requests), vec!["Inter", "Inter"]);
        assert_eq!(requests[1].weight, Some(600));
    }

    #[test]
    fn test_weight_quantized_on_emit() {
        let tree = Node::element("div").style("font-family: 'Inter'; font-weight: 650");
        let requests = extract_font_requests(&tree).unwrap();
        assert_eq!(requests[0].weight, Some(600));
    }

    #[test]
    fn test_signed_weights_quantized() {
        let tree = Node::element("div")
            .style("font-family: 'Inter'; font-weight: 700")
            .child(Node::element("span").style("font-weight: -100"))
            .child(Node::element("b").style("font-weight: +500"));

        let requests = extract_font_requests(&tree).unwrap();
        assert_eq!(
            requests,
            vec![
                FontRequest::new("Inter").weight(700),
                FontRequest::new("Inter").weight(100),
                FontRequest::new("Inter").weight(500),
            ]
        );
    }

    #[test]
    fn test_style_overrides_attributes() {
        let tree = Node::element("div")
            .attr("font-family", "'FromAttr'")
            .attr("font-weight", "300")
            .style("font-family: 'FromStyle'");

        let requests = extract_font_requests(&tree).unwrap();
        assert_eq!(requests, vec![FontRequest::new("FromStyle").weight(300)]);
    }

    #[test]
    fn test_attribute_only() {
        let tree = Node::element("text").attr("font-family", "\"Fira Code\", monospace");
        let requests = extract_font_requests(&tree).unwrap();
        assert_eq!(families(&requests), vec!["Fira Code"]);
    }

    #[test]
    fn test_entities_in_style_string() {
        let tree = Node::element("div").style("font-family: &quot;Sour Gummy&quot;");
        let requests = extract_font_requests(&tree).unwrap();
        assert_eq!(families(&requests), vec!["Sour Gummy"]);
    }

    #[test]
    fn test_lists_are_traversed() {
        let tree = Node::list(vec![
            Node::text("loose"),
            Node::element("a").style_map(&[("fontFamily", "'A'")]),
            Node::list(vec![Node::element("b").style_map(&[("fontFamily", "'B'")])]),
        ]);

        let requests = extract_font_requests(&tree).unwrap();
        assert_eq!(families(&requests), vec!["A", "B"]);
    }

    #[test]
    fn test_duplicates_collapsed() {
        let tree = Node::element("div")
            .child(Node::element("p").style("font-family: 'Inter'; font-weight: 401"))
            .child(Node::element("p").style("font-family: 'Inter'; font-weight: 399"));

        assert_eq!(extract_font_requests(&tree).unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_style_aborts() {
        let tree = Node::element("div")
            .style("font-family: 'Inter'")
            .child(Node::element("span").prop("style", PropValue::Bool(true)));

        let err = extract_font_requests(&tree).unwrap_err();
        match err {
            CssError::MalformedStyle { tag, found } => {
                assert_eq!(tag, "span");
                assert_eq!(found, "boolean");
            }
        }
    }

    #[test]
    fn test_null_style_ignored() {
        let tree = Node::element("div")
            .attr("font-family", "'Inter'")
            .prop("style", PropValue::Null);
        assert_eq!(extract_font_requests(&tree).unwrap().len(), 1);
    }
}
