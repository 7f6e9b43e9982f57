//! Read-only preview of a configured catalog entry.
//!
//! [`render`] is pure: it turns an entry and its configuration into a small
//! tree of [`PreviewNode`]s that a UI can draw and the CLI prints as an
//! indented outline.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::catalog::{CatalogEntry, Family};
use crate::selection::{Configuration, DEFAULT_TOKEN};

/// Size value that shrinks a button to its icon.
const ICON_ONLY_SIZE: &str = "icon";

/// One element of a rendered preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewNode {
    /// What the element is (`button`, `icon`, `section`, ...)
    pub role: String,
    /// Visible text, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Presentation attributes (`variant`, `size`, ...)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    /// Nested elements in drawing order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PreviewNode>,
}

impl PreviewNode {
    /// Creates an empty node.
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            text: None,
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Sets the text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    /// Appends a child.
    #[must_use]
    pub fn child(mut self, child: PreviewNode) -> Self {
        self.children.push(child);
        self
    }

    /// Appends several children.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = PreviewNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Depth-first search for the first node with `role`.
    #[must_use]
    pub fn find(&self, role: &str) -> Option<&PreviewNode> {
        if self.role == role {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(role))
    }

    fn write_outline(&self, out: &mut String, depth: usize) {
        let _ = write!(out, "{}{}", "  ".repeat(depth), self.role);
        for (key, value) in &self.attrs {
            let _ = write!(out, " {key}={value}");
        }
        if let Some(text) = &self.text {
            let _ = write!(out, " \"{text}\"");
        }
        out.push('\n');
        for child in &self.children {
            child.write_outline(out, depth + 1);
        }
    }
}

/// Result of rendering a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PreviewFragment {
    /// Nothing is selected
    Empty,
    /// No dedicated rule exists for the entry
    Placeholder {
        /// Entry name
        name: String,
        /// Entry description
        description: String,
        /// Active variant, when the entry has a variant axis
        #[serde(skip_serializing_if = "Option::is_none")]
        variant: Option<String>,
    },
    /// A dedicated rule produced a tree
    Rendered {
        /// Root element
        root: PreviewNode,
    },
}

impl PreviewFragment {
    /// Indented text outline, one node per line.
    #[must_use]
    pub fn to_outline(&self) -> String {
        match self {
            Self::Empty => "(no preview)\n".to_string(),
            Self::Placeholder {
                name,
                description,
                variant,
            } => {
                let mut out = format!("placeholder \"{name}\"");
                if let Some(variant) = variant {
                    let _ = write!(out, " variant={variant}");
                }
                out.push('\n');
                if !description.is_empty() {
                    let _ = writeln!(out, "  {description}");
                }
                out
            }
            Self::Rendered { root } => {
                let mut out = String::new();
                root.write_outline(&mut out, 0);
                out
            }
        }
    }

    /// Root node of a rendered preview.
    #[must_use]
    pub fn root(&self) -> Option<&PreviewNode> {
        match self {
            Self::Rendered { root } => Some(root),
            _ => None,
        }
    }
}

/// Renders `entry` as configured by `config`.
#[must_use]
pub fn render(entry: Option<&CatalogEntry>, config: &Configuration) -> PreviewFragment {
    let Some(entry) = entry else {
        return PreviewFragment::Empty;
    };

    let root = match entry.family() {
        Family::Components => render_component(entry, config),
        Family::Blocks => Some(render_block(entry, config)),
        Family::Icons => Some(render_icon(entry, config)),
    };

    match root {
        Some(root) => PreviewFragment::Rendered { root },
        None => PreviewFragment::Placeholder {
            name: entry.name.clone(),
            description: entry.description.clone(),
            variant: entry.has_variants().then(|| config.variant.clone()),
        },
    }
}

fn styled(role: &str, entry: &CatalogEntry, config: &Configuration) -> PreviewNode {
    let mut node = PreviewNode::new(role);
    if entry.has_variants() {
        node = node.attr("variant", config.variant.as_str());
    }
    if !entry.size_options().is_empty() {
        node = node.attr("size", config.size.as_str());
    }
    node
}

fn icon_node(config: &Configuration) -> Option<PreviewNode> {
    config
        .has_icon()
        .then(|| PreviewNode::new("icon").attr("name", config.icon.as_str()))
}

fn text_or(config: &Configuration, fallback: &str) -> String {
    if config.text.trim().is_empty() {
        fallback.to_string()
    } else {
        config.text.clone()
    }
}

fn render_component(entry: &CatalogEntry, config: &Configuration) -> Option<PreviewNode> {
    let node = match entry.id.as_str() {
        "button" => render_button(entry, config),
        "badge" => {
            let mut node = styled("badge", entry, config);
            if let Some(icon) = icon_node(config) {
                node = node.child(icon.attr("scale", "small"));
            }
            node.child(PreviewNode::new("text").text(config.text.as_str()))
        }
        "toggle" => {
            let mut node = styled("toggle", entry, config);
            if let Some(icon) = icon_node(config) {
                node = node.child(icon);
            }
            node.child(PreviewNode::new("text").text(config.text.as_str()))
        }
        "alert" => styled("alert", entry, config)
            .child(PreviewNode::new("icon").attr("name", "bell"))
            .child(PreviewNode::new("title").text("Alert Title"))
            .child(PreviewNode::new("description").text("This is an alert message description")),
        "card" => PreviewNode::new("card")
            .child(
                PreviewNode::new("header")
                    .child(PreviewNode::new("title").text("Card Title"))
                    .child(PreviewNode::new("description").text("Card description goes here")),
            )
            .child(PreviewNode::new("content").text("This is the card content area."))
            .child(
                PreviewNode::new("footer")
                    .child(PreviewNode::new("button").attr("size", "sm").text("Action")),
            ),
        "input" => PreviewNode::new("input").attr("placeholder", text_or(config, "Enter text...")),
        "textarea" => PreviewNode::new("textarea")
            .attr("placeholder", text_or(config, "Enter text..."))
            .attr("rows", "3"),
        "checkbox" => PreviewNode::new("checkbox").attr("checked", "true"),
        "switch" => PreviewNode::new("switch").attr("checked", "true"),
        "label" => PreviewNode::new("label").text(text_or(config, "Label")),
        "progress" => PreviewNode::new("progress").attr("value", "60"),
        "slider" => PreviewNode::new("slider").attr("value", "50").attr("max", "100"),
        "separator" => PreviewNode::new("separator"),
        "skeleton" => PreviewNode::new("skeleton")
            .child(PreviewNode::new("bar").attr("height", "48"))
            .child(PreviewNode::new("bar").attr("height", "16")),
        "avatar" => PreviewNode::new("avatar")
            .child(PreviewNode::new("image").attr("alt", "Avatar"))
            .child(PreviewNode::new("fallback").text("CN")),
        "aspect-ratio" => PreviewNode::new("aspect-ratio")
            .attr("ratio", "16:9")
            .text("16:9 Aspect Ratio"),
        _ => return None,
    };
    Some(node)
}

fn render_button(entry: &CatalogEntry, config: &Configuration) -> PreviewNode {
    let icon = icon_node(config);
    // An icon-only button with no icon would be empty; fall back to default size.
    let size = if config.size == ICON_ONLY_SIZE && icon.is_none() {
        DEFAULT_TOKEN
    } else {
        config.size.as_str()
    };

    let mut node = PreviewNode::new("button");
    if entry.has_variants() {
        node = node.attr("variant", config.variant.as_str());
    }
    if !entry.size_options().is_empty() {
        node = node.attr("size", size);
    }

    let text = (config.size != ICON_ONLY_SIZE)
        .then(|| PreviewNode::new("text").text(config.text.as_str()));
    let icon_right = config.icon_position == "right";

    match (icon, icon_right) {
        (Some(icon), false) => node.child(icon).children(text),
        (Some(icon), true) => node.children(text).child(icon),
        (None, _) => node.children(text),
    }
}

fn block_sections(id: &str) -> &'static [&'static str] {
    match id {
        "hero" => &["heading", "subheading", "actions"],
        "features" => &["heading", "feature-grid"],
        "pricing" => &["heading", "plan-cards", "billing-toggle"],
        "testimonials" => &["heading", "quotes"],
        "faq" => &["heading", "questions"],
        "contact" => &["heading", "form", "details"],
        "cta" => &["heading", "actions"],
        "footer" => &["link-columns", "legal"],
        "navbar" => &["logo", "links", "actions"],
        "team" => &["heading", "members"],
        "gallery" => &["heading", "images"],
        "newsletter" => &["heading", "email-form"],
        "login" | "sign-up" => &["heading", "form", "submit"],
        "dashboard" => &["sidebar", "stats", "chart"],
        _ => &["content"],
    }
}

fn render_block(entry: &CatalogEntry, config: &Configuration) -> PreviewNode {
    let label = entry
        .variant_options()
        .iter()
        .find(|option| option.value == config.variant)
        .map_or(config.variant.as_str(), |option| option.label.as_str());

    let sections = block_sections(&entry.id).iter().map(|section| {
        let node = PreviewNode::new("section").attr("name", *section);
        if *section == "heading" {
            node.text(text_or(config, &entry.name))
        } else {
            node
        }
    });

    PreviewNode::new("block")
        .attr("id", entry.id.as_str())
        .attr("variant", label)
        .text(entry.name.as_str())
        .children(sections)
}

fn render_icon(entry: &CatalogEntry, config: &Configuration) -> PreviewNode {
    PreviewNode::new("icon-frame")
        .attr("size", config.size.as_str())
        .attr("color", config.icon_color.as_str())
        .child(PreviewNode::new("glyph").attr("name", entry.id.as_str()))
        .child(PreviewNode::new("label").text(entry.name.as_str()))
}
