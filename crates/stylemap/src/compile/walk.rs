//! The recursive block walker.
//!
//! Each call walks one block and returns the rule node it built, so nested
//! nodes are composed by the caller rather than written into shared output.

use serde_yaml::{Mapping, Value};

use super::error::CompileError;
use super::key::{KeyKind, NestingState, VARIANTS_KEY};
use crate::description::{render_key, value_kind};
use crate::rules::{ClassVariants, RuleNode};

/// What walking one block produced.
#[derive(Debug, Default)]
pub(super) struct Walked {
    pub node: RuleNode,
    /// Set when the block declared `@variants`.
    pub variants: Option<ClassVariants>,
    /// Rules for variants that carried CSS, to be placed beside the class.
    pub variant_rules: Vec<(String, RuleNode)>,
}

/// Walks `block` in `state`. `class_name` is the class being compiled (a
/// variant class inside variant blocks) and `path` locates the block for errors.
pub(super) fn walk(
    block: &Value,
    state: NestingState,
    class_name: &str,
    path: &str,
) -> Result<Walked, CompileError> {
    let entries = expect_block(block, path)?;
    let variants_at = variants_position(entries);

    let mut walked = Walked::default();
    for (index, (key, value)) in entries.iter().enumerate() {
        // Keys up to and including @variants are dispatched first, so their
        // errors come before the order error.
        if variants_at.is_some_and(|at| index > at) {
            return Err(CompileError::VariantsNotLast {
                path: path.to_string(),
                key: render_key(key),
            });
        }

        let key = key_text(key, path)?;
        let kind = KeyKind::classify(&key);
        tracing::trace!(path, key = %key, %kind, %state, "dispatch");

        match kind {
            KeyKind::Property => walked.node.declare(key, value.clone()),
            KeyKind::PseudoSelector => {
                let inner_state =
                    state
                        .enter(kind)
                        .ok_or_else(|| CompileError::PseudoNested {
                            path: path.to_string(),
                            key: quote(&key),
                        })?;
                let inner = walk(value, inner_state, class_name, &child_path(path, &key))?;
                walked.node.nest(format!("&{}", key), inner.node);
            }
            KeyKind::MediaQuery => {
                let inner_state =
                    state
                        .enter(kind)
                        .ok_or_else(|| CompileError::MediaInvalidScope {
                            path: path.to_string(),
                            key: quote(&key),
                            state,
                        })?;
                let inner = walk(value, inner_state, class_name, &child_path(path, &key))?;
                walked.node.nest(key, inner.node);
            }
            KeyKind::Variants => {
                let inner_state =
                    state
                        .enter(kind)
                        .ok_or_else(|| CompileError::VariantsNotTopLevel {
                            path: path.to_string(),
                            state,
                        })?;
                let (variants, rules) =
                    walk_variants(value, inner_state, class_name, &child_path(path, &key))?;
                walked.variants = Some(variants);
                walked.variant_rules = rules;
            }
            KeyKind::Invalid => {
                return Err(CompileError::InvalidKey {
                    path: path.to_string(),
                    key: quote(&key),
                })
            }
        }
    }

    Ok(walked)
}

/// Registers every variant of `class_name` and walks the ones carrying CSS.
fn walk_variants(
    value: &Value,
    state: NestingState,
    class_name: &str,
    path: &str,
) -> Result<(ClassVariants, Vec<(String, RuleNode)>), CompileError> {
    let entries = expect_block(value, path)?;

    let mut variants = ClassVariants::new(class_name);
    let mut rules = Vec::new();
    for (name, block) in entries {
        let name = key_text(name, path)?;
        let variant_class = variants.register(&name);
        if is_blank(block) {
            continue;
        }
        let inner = walk(block, state, &variant_class, &child_path(path, &name))?;
        rules.push((variant_class, inner.node));
    }

    Ok((variants, rules))
}

fn expect_block<'a>(value: &'a Value, path: &str) -> Result<&'a Mapping, CompileError> {
    match value {
        Value::Mapping(entries) if !entries.is_empty() => Ok(entries),
        Value::Mapping(_) | Value::Null => Err(CompileError::EmptyBlock {
            path: path.to_string(),
        }),
        other => Err(CompileError::NotABlock {
            path: path.to_string(),
            found: value_kind(other),
        }),
    }
}

/// Index of the `@variants` key in a block, if it has one.
fn variants_position(entries: &Mapping) -> Option<usize> {
    entries
        .keys()
        .position(|key| key.as_str() == Some(VARIANTS_KEY))
}

/// Keys are strings; numbers and booleans are read as their text.
fn key_text(key: &Value, path: &str) -> Result<String, CompileError> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(CompileError::InvalidKey {
            path: path.to_string(),
            key: render_key(other),
        }),
    }
}

/// A variant value that means "class name only, no CSS".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Mapping(entries) => entries.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn child_path(path: &str, key: &str) -> String {
    format!("{} > {}", path, key)
}

fn quote(key: &str) -> String {
    format!("'{}'", key)
}
