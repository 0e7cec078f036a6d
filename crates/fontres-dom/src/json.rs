//! JSON Tree Import
//!
//! Converts the React-like element shape produced by JSX runtimes and
//! tiny HTML parsers into [`Node`]:
//!
//! ```json
//! { "type": "div", "props": { "style": { "fontFamily": "'Inter'" }, "children": ["Hi"] } }
//! ```

use serde_json::Value;

use crate::node::format_number;
use crate::{DomError, Element, Node, Primitive, PropValue, Props};

impl Node {
    /// Parse a JSON document into a node tree
    pub fn from_json(json: &str) -> Result<Node, DomError> {
        let value: Value = serde_json::from_str(json)?;
        Node::from_value(&value)
    }

    /// Convert an already-parsed JSON value into a node tree
    pub fn from_value(value: &Value) -> Result<Node, DomError> {
        convert(value, "$")
    }
}

fn convert(value: &Value, path: &str) -> Result<Node, DomError> {
    Ok(match value {
        Value::Null => Node::Leaf(Primitive::Null),
        Value::Bool(b) => Node::Leaf(Primitive::Bool(*b)),
        Value::Number(n) => Node::Leaf(Primitive::Number(n.as_f64().unwrap_or_default())),
        Value::String(s) => Node::Leaf(Primitive::Text(s.clone())),
        Value::Array(items) => Node::List(convert_all(items, path)?),
        Value::Object(map) => {
            let tag = match map.get("type") {
                Some(Value::String(tag)) => tag.clone(),
                _ => {
                    return Err(DomError::InvalidNode {
                        path: path.to_string(),
                        message: "element is missing a string `type`".into(),
                    });
                }
            };

            let mut props = Props::new();
            let mut children = Vec::new();

            if let Some(Value::Object(raw_props)) = map.get("props") {
                for (name, raw) in raw_props {
                    let prop_path = format!("{}.props.{}", path, name);
                    match name.as_str() {
                        "children" => children = convert_children(raw, &prop_path)?,
                        "style" => props.set(name, convert_style(raw, &prop_path)?),
                        _ => match convert_scalar(raw) {
                            Some(v) => props.set(name, v),
                            None => tracing::debug!("Skipping structured prop {}", prop_path),
                        },
                    }
                }
            }

            Node::Element(Element { tag, props, children })
        }
    })
}

fn convert_all(items: &[Value], path: &str) -> Result<Vec<Node>, DomError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| convert(item, &format!("{}[{}]", path, i)))
        .collect()
}

/// `children` may be an array, a single node or a primitive
fn convert_children(raw: &Value, path: &str) -> Result<Vec<Node>, DomError> {
    match raw {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => convert_all(items, path),
        other => Ok(vec![convert(other, path)?]),
    }
}

fn convert_style(raw: &Value, path: &str) -> Result<PropValue, DomError> {
    match raw {
        Value::Object(decls) => {
            let mut map = Vec::with_capacity(decls.len());
            for (property, value) in decls {
                match value {
                    Value::String(s) => map.push((property.clone(), s.clone())),
                    Value::Number(n) => {
                        map.push((property.clone(), format_number(n.as_f64().unwrap_or_default())))
                    }
                    _ => tracing::debug!("Skipping non-scalar declaration {}.{}", path, property),
                }
            }
            Ok(PropValue::Map(map))
        }
        Value::Array(_) => Err(DomError::InvalidNode {
            path: path.to_string(),
            message: "style must be a string or an object".into(),
        }),
        // Scalars are kept as-is so the cascade can reject them
        other => Ok(convert_scalar(other).unwrap_or(PropValue::Null)),
    }
}

fn convert_scalar(raw: &Value) -> Option<PropValue> {
    match raw {
        Value::Null => Some(PropValue::Null),
        Value::Bool(b) => Some(PropValue::Bool(*b)),
        Value::Number(n) => Some(PropValue::Number(n.as_f64().unwrap_or_default())),
        Value::String(s) => Some(PropValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => None,
    }
}
