//! Reference engine rendering sheets to CSS text.

use std::sync::atomic::{AtomicUsize, Ordering};

use minijinja::Environment;
use serde_yaml::Value;

use super::{EngineError, Props, Sheet, SheetOptions, StyleEngine};
use crate::rules::{RuleEntry, RuleNode, RuleTree};

/// An engine that renders sheets to CSS text.
///
/// Every sheet gets a sequential id, starting at 1, and every rule in it a
/// generated class name `<rule>-<sheet id>-<rule index>`.
///
/// String values containing `{{` are dynamic: linked sheets evaluate them as
/// MiniJinja expressions against the props of the last [`Sheet::update`],
/// and unlinked sheets leave those declarations out.
///
/// # Example
///
/// ```rust
/// use stylemap::{compile, CssEngine, Description, Sheet, SheetOptions, StyleEngine};
///
/// let compiled = compile(&Description::from_yaml_str(r#"
/// title:
///   color: "{{ tone }}"
///   font-weight: bold
/// "#).unwrap()).unwrap();
///
/// let engine = CssEngine::new();
/// let mut sheet = engine.create_sheet(compiled.rules(), SheetOptions::linked());
/// sheet.update(&serde_json::json!({ "tone": "crimson" })).unwrap();
///
/// assert_eq!(sheet.class_name("title"), Some("title-1-1"));
/// assert!(sheet.to_css().contains("color: crimson;"));
/// ```
#[derive(Debug, Default)]
pub struct CssEngine {
    sheets: AtomicUsize,
}

impl CssEngine {
    /// Creates an engine whose first sheet gets id 1.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StyleEngine for CssEngine {
    type Sheet = CssSheet;

    fn create_sheet(&self, rules: &RuleTree, options: SheetOptions) -> CssSheet {
        let id = self.sheets.fetch_add(1, Ordering::Relaxed) + 1;
        CssSheet::new(id, rules.clone(), options)
    }
}

/// A sheet created by [`CssEngine`].
#[derive(Debug, Clone)]
pub struct CssSheet {
    id: usize,
    options: SheetOptions,
    attached: bool,
    rules: RuleTree,
    /// `rules` with dynamic values evaluated, or dropped when there are no props.
    resolved: RuleTree,
    class_names: Vec<(String, String)>,
}

impl CssSheet {
    fn new(id: usize, rules: RuleTree, options: SheetOptions) -> Self {
        let class_names = rules
            .names()
            .enumerate()
            .map(|(index, name)| (name.to_string(), format!("{}-{}-{}", name, id, index + 1)))
            .collect();
        // Without props there is nothing to evaluate, so this cannot fail.
        let resolved = strip_dynamic(&rules);
        Self {
            id,
            options,
            attached: false,
            rules,
            resolved,
            class_names,
        }
    }

    /// The sheet id assigned by the engine.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The options the sheet was created with.
    pub fn options(&self) -> SheetOptions {
        self.options
    }

    /// The rule tree as compiled, before dynamic values were evaluated.
    pub fn rules(&self) -> &RuleTree {
        &self.rules
    }

    /// Renders the sheet as CSS text.
    ///
    /// Declarations come first in each rule, followed by its pseudo-selector
    /// rules and media blocks in authoring order. Rules left without
    /// declarations are omitted.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for (name, node) in self.resolved.iter() {
            if let Some(class_name) = self.class_name(name) {
                write_rule(&mut out, &format!(".{}", class_name), node, 0);
            }
        }
        out
    }
}

impl Sheet for CssSheet {
    fn class_name(&self, rule: &str) -> Option<&str> {
        self.class_names
            .iter()
            .find(|(name, _)| name == rule)
            .map(|(_, class_name)| class_name.as_str())
    }

    fn attach(&mut self) {
        self.attached = true;
    }

    fn detach(&mut self) {
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn update(&mut self, props: &Props) -> Result<(), EngineError> {
        if !self.options.link {
            return Ok(());
        }
        if !(props.is_object() || props.is_null()) {
            return Err(EngineError::InvalidProps {
                found: json_kind(props),
            });
        }

        let env = Environment::new();
        let mut resolved = RuleTree::new();
        for (name, node) in self.rules.iter() {
            resolved.insert(name, resolve_node(node, name, Some((&env, props)))?);
        }
        self.resolved = resolved;
        Ok(())
    }
}

fn strip_dynamic(rules: &RuleTree) -> RuleTree {
    let mut stripped = RuleTree::new();
    for (name, node) in rules.iter() {
        let node = resolve_node(node, name, None).unwrap_or_default();
        stripped.insert(name, node);
    }
    stripped
}

/// Copies `node`, evaluating dynamic values against `props` or dropping them
/// when there are none.
fn resolve_node(
    node: &RuleNode,
    rule: &str,
    props: Option<(&Environment<'_>, &Props)>,
) -> Result<RuleNode, EngineError> {
    let mut out = RuleNode::new();
    for (key, entry) in node.iter() {
        match entry {
            RuleEntry::Nested(inner) => out.nest(key, resolve_node(inner, rule, props)?),
            RuleEntry::Declaration(value) => match (dynamic_template(value), props) {
                (None, _) => out.declare(key, value.clone()),
                (Some(_), None) => {}
                (Some(template), Some((env, props))) => {
                    let rendered = env.render_str(template, props).map_err(|source| {
                        EngineError::DynamicValue {
                            rule: rule.to_string(),
                            property: key.to_string(),
                            source,
                        }
                    })?;
                    out.declare(key, Value::String(rendered));
                }
            },
        }
    }
    Ok(out)
}

fn dynamic_template(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| s.contains("{{"))
}

fn write_rule(out: &mut String, selector: &str, node: &RuleNode, depth: usize) {
    let indent = "  ".repeat(depth);

    let declarations: Vec<(&str, String)> = node
        .iter()
        .filter_map(|(property, entry)| {
            let value = format_value(entry.as_declaration()?)?;
            Some((property, value))
        })
        .collect();
    if !declarations.is_empty() {
        out.push_str(&format!("{}{} {{\n", indent, selector));
        for (property, value) in declarations {
            out.push_str(&format!("{}  {}: {};\n", indent, property, value));
        }
        out.push_str(&format!("{}}}\n", indent));
    }

    for (key, entry) in node.iter() {
        let Some(inner) = entry.as_nested() else {
            continue;
        };
        if key.starts_with('@') {
            let mut body = String::new();
            write_rule(&mut body, selector, inner, depth + 1);
            if !body.is_empty() {
                out.push_str(&format!("{}{} {{\n", indent, key));
                out.push_str(&body);
                out.push_str(&format!("{}}}\n", indent));
            }
        } else {
            write_rule(out, &key.replace('&', selector), inner, depth);
        }
    }
}

/// Formats a declaration value; `None` leaves the declaration out.
///
/// Sequences are comma-separated lists whose nested sequences are
/// space-separated, so `[[opacity, 1s], [color, 2s]]` becomes
/// `opacity 1s, color 2s`.
fn format_value(value: &Value) -> Option<String> {
    match value {
        Value::Sequence(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::Sequence(words) => {
                        let words: Vec<String> = words.iter().filter_map(format_scalar).collect();
                        (!words.is_empty()).then(|| words.join(" "))
                    }
                    other => format_scalar(other),
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        other => format_scalar(other),
    }
}

fn format_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn json_kind(value: &Props) -> &'static str {
    use serde_json::Value as Json;

    match value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}
