//! Computed Font Style
//!
//! Per-node font properties produced during the cascade walk. A node's own
//! style is built from its font attributes overlaid with its `style`
//! declarations, then combined with the inherited style.

use std::collections::BTreeSet;

use fontres_dom::Props;

use crate::properties::{
    is_italic_style, parse_font_family, parse_font_style, parse_font_weight, FontProperty,
};

/// Font properties in force at one node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedStyle {
    /// Family list (only set when non-empty)
    pub font_families: Option<Vec<String>>,
    /// Families written quoted; accumulates down the tree
    pub quoted_families: BTreeSet<String>,
    /// Raw declared weight; quantized when a request is emitted
    pub font_weight: Option<i32>,
    /// Lower-cased `font-style`
    pub font_style: Option<String>,
}

impl ComputedStyle {
    /// Style from direct font attributes (`font-family="..."`, `fontWeight="..."`)
    pub fn from_attributes(props: &Props) -> Self {
        let mut style = Self::default();
        for property in [FontProperty::Family, FontProperty::Weight, FontProperty::Style] {
            let value = property
                .attribute_names()
                .iter()
                .find_map(|name| props.get(name).and_then(|v| v.as_text()).filter(|v| !v.is_empty()));
            if let Some(value) = value {
                style.apply(property, &value);
            }
        }
        style
    }

    /// Style from a semicolon separated declaration string
    pub fn from_inline(css: &str) -> Self {
        let mut style = Self::default();
        for (property, value) in split_declarations(css) {
            style.apply_declaration(property, value);
        }
        style
    }

    /// Style from a pre-parsed declaration mapping
    pub fn from_declarations<'a, I>(declarations: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut style = Self::default();
        for (property, value) in declarations {
            style.apply_declaration(property, value);
        }
        style
    }

    /// Apply one declaration; unknown properties are ignored
    pub fn apply_declaration(&mut self, property: &str, value: &str) {
        if let Some(property) = FontProperty::from_name(property) {
            self.apply(property, value);
        }
    }

    fn apply(&mut self, property: FontProperty, value: &str) {
        match property {
            FontProperty::Family => {
                let list = parse_font_family(value);
                if !list.families.is_empty() {
                    self.font_families = Some(list.families);
                    self.quoted_families = list.quoted;
                }
            }
            FontProperty::Weight => {
                if let Some(weight) = parse_font_weight(value) {
                    self.font_weight = Some(weight);
                }
            }
            FontProperty::Style => self.font_style = Some(parse_font_style(value)),
        }
    }

    /// Overlay `over` on top of `self` at the same node; `over` wins per property.
    ///
    /// The family list and its quoted set travel together.
    pub fn overlay(&self, over: &ComputedStyle) -> ComputedStyle {
        let (font_families, quoted_families) = if over.font_families.is_some() {
            (over.font_families.clone(), over.quoted_families.clone())
        } else {
            (self.font_families.clone(), self.quoted_families.clone())
        };

        ComputedStyle {
            font_families,
            quoted_families,
            font_weight: over.font_weight.or(self.font_weight),
            font_style: over.font_style.clone().or_else(|| self.font_style.clone()),
        }
    }

    /// Combine this node's own style with the inherited one.
    ///
    /// Only quoted families survive: if this node declared quoted names, its
    /// own list filtered to them is used, otherwise the inherited list
    /// filtered to the inherited quoted set. Quoted sets are unioned.
    pub fn inherit(&self, parent: &ComputedStyle) -> ComputedStyle {
        let font_families = if !self.quoted_families.is_empty() {
            quoted_only(self.font_families.as_deref(), &self.quoted_families)
        } else {
            quoted_only(parent.font_families.as_deref(), &parent.quoted_families)
        };

        let mut quoted_families = parent.quoted_families.clone();
        quoted_families.extend(self.quoted_families.iter().cloned());

        ComputedStyle {
            font_families,
            quoted_families,
            font_weight: self.font_weight.or(parent.font_weight),
            font_style: self.font_style.clone().or_else(|| parent.font_style.clone()),
        }
    }

    /// Weight in force, defaulting to 400
    pub fn weight_or_default(&self) -> i32 {
        self.font_weight.unwrap_or(400)
    }

    pub fn is_italic(&self) -> bool {
        self.font_style.as_deref().is_some_and(is_italic_style)
    }
}

fn quoted_only(families: Option<&[String]>, quoted: &BTreeSet<String>) -> Option<Vec<String>> {
    let filtered: Vec<String> = families?
        .iter()
        .filter(|f| quoted.contains(*f))
        .cloned()
        .collect();
    (!filtered.is_empty()).then_some(filtered)
}

/// Split `a: b; c: d` into trimmed `(property, value)` pairs
pub fn split_declarations(css: &str) -> impl Iterator<Item = (&str, &str)> {
    css.split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .filter_map(|decl| {
            let (property, value) = decl.split_once(':')?;
            Some((property.trim(), value.trim()))
        })
}
