//! Document Nodes
//!
//! A node is either a primitive leaf, an element, or a list of nodes.
//! Traversal matches on the variant instead of inspecting shapes at runtime.

/// Document node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Text, number, boolean or null
    Leaf(Primitive),
    /// Element with tag, props and children
    Element(Element),
    /// Fragment: ordered sequence of nodes
    List(Vec<Node>),
}

/// Primitive leaf value
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

/// Element node
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name (`div`, `span`, ...)
    pub tag: String,
    /// Props other than children
    pub props: Props,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

/// Loosely typed prop value
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
    /// Pre-parsed declaration mapping (`{ fontFamily: "'Inter'" }`)
    Map(Vec<(String, String)>),
}

impl PropValue {
    /// Scalar value as text (strings and numbers only)
    pub fn as_text(&self) -> Option<String> {
        match self {
            PropValue::Text(s) => Some(s.clone()),
            PropValue::Number(n) => Some(format_number(*n)),
            _ => None,
        }
    }
}

/// Ordered prop list, later entries shadow earlier ones
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prop, replacing an existing value with the same name
    pub fn set(&mut self, name: &str, value: PropValue) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value;
        } else {
            self.entries.push((name.to_string(), value));
        }
    }

    /// Look up a prop by name
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// The `style` prop, if any
    pub fn style(&self) -> Option<&PropValue> {
        self.get("style")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Node {
    /// Create an element node with no props or children
    pub fn element(tag: &str) -> Self {
        Node::Element(Element {
            tag: tag.to_string(),
            props: Props::new(),
            children: Vec::new(),
        })
    }

    /// Create a text leaf
    pub fn text(content: &str) -> Self {
        Node::Leaf(Primitive::Text(content.to_string()))
    }

    /// Create a fragment
    pub fn list(nodes: Vec<Node>) -> Self {
        Node::List(nodes)
    }

    /// Set an attribute (no-op on non-elements)
    pub fn attr(self, name: &str, value: &str) -> Self {
        self.prop(name, PropValue::Text(value.to_string()))
    }

    /// Set a `style` declaration string
    pub fn style(self, css: &str) -> Self {
        self.prop("style", PropValue::Text(css.to_string()))
    }

    /// Set a pre-parsed `style` mapping
    pub fn style_map(self, declarations: &[(&str, &str)]) -> Self {
        let map = declarations
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.prop("style", PropValue::Map(map))
    }

    /// Set an arbitrary prop
    pub fn prop(mut self, name: &str, value: PropValue) -> Self {
        if let Node::Element(el) = &mut self {
            el.props.set(name, value);
        }
        self
    }

    /// Append a child (no-op on non-elements)
    pub fn child(mut self, child: Node) -> Self {
        if let Node::Element(el) = &mut self {
            el.children.push(child);
        }
        self
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Count element nodes in this subtree
    pub fn element_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Element(el) => 1 + el.children.iter().map(Node::element_count).sum::<usize>(),
            Node::List(nodes) => nodes.iter().map(Node::element_count).sum(),
        }
    }
}

/// Integral numbers print without a fractional part (`700`, not `700.0`)
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
