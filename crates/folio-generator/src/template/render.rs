//! Directive evaluation.

use std::borrow::Cow;

use super::{
    parse::{Node, parse},
    resolve::Scope,
    value::Value,
};

/// A parsed template, ready to be rendered any number of times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parse template text. Never fails; see [`parse`] for how malformed
    /// directives degrade.
    pub fn compile(source: &str) -> Self {
        Self {
            nodes: parse(source),
        }
    }

    /// Render against a context value.
    ///
    /// Substituted values are emitted verbatim and are never scanned for
    /// directives again.
    pub fn render(&self, context: &Value) -> String {
        let mut out = String::new();
        render_nodes(&self.nodes, &Scope::root(context), &mut out);
        out
    }

    /// Whether the template produces no output for any context.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Parse and render in one step.
pub fn render_str(source: &str, context: &Value) -> String {
    Template::compile(source).render(context)
}

fn render_nodes(nodes: &[Node], scope: &Scope<'_>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(path) => {
                if let Some(value) = scope.resolve(path) {
                    out.push_str(&value.to_text());
                }
            }
            Node::Each { path, body } => {
                let Some(value) = scope.resolve(path).map(force) else {
                    continue;
                };
                if let Value::List(items) = &*value {
                    for (index, item) in items.iter().enumerate() {
                        render_nodes(body, &scope.child(item, index), out);
                    }
                }
            }
            Node::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let branch = if evaluate_condition(condition, scope) {
                    then_branch
                } else {
                    else_branch
                };
                render_nodes(branch, scope, out);
            }
        }
    }
}

fn force(value: Cow<'_, Value>) -> Cow<'_, Value> {
    match value {
        Cow::Borrowed(Value::Lazy(lazy)) => Cow::Owned(lazy.get().force()),
        Cow::Owned(value @ Value::Lazy(_)) => Cow::Owned(value.force()),
        other => other,
    }
}

/// Comparison operators accepted in `{{#if left op right}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    LooseEq,
    StrictEq,
    LooseNe,
    StrictNe,
}

impl Comparison {
    fn parse(op: &str) -> Option<Self> {
        match op {
            "==" => Some(Self::LooseEq),
            "===" => Some(Self::StrictEq),
            "!=" => Some(Self::LooseNe),
            "!==" => Some(Self::StrictNe),
            _ => None,
        }
    }

    fn apply(self, left: &Value, right: &Value) -> bool {
        match self {
            Self::LooseEq => loose_eq(left, right),
            Self::LooseNe => !loose_eq(left, right),
            Self::StrictEq => strict_eq(left, right),
            Self::StrictNe => !strict_eq(left, right),
        }
    }
}

/// Evaluate a condition.
///
/// A single token is a truthiness check. Otherwise the condition must be
/// exactly `left op right`; anything else is false.
fn evaluate_condition(condition: &str, scope: &Scope<'_>) -> bool {
    let tokens: Vec<&str> = condition.split_whitespace().collect();
    match tokens.as_slice() {
        [path] => scope.resolve(path).is_some_and(|v| v.is_truthy()),
        [left, op, right] => match Comparison::parse(op) {
            Some(cmp) => cmp.apply(&operand(left, scope), &operand(right, scope)),
            None => false,
        },
        _ => false,
    }
}

/// Resolve an operand as a path, falling back to its literal text.
fn operand(token: &str, scope: &Scope<'_>) -> Value {
    match scope.resolve(token).map(|v| v.into_owned().force()) {
        Some(Value::Null) | None => Value::Str(unquote(token).to_string()),
        Some(value) => value,
    }
}

fn unquote(token: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = token
            .strip_prefix(quote)
            .and_then(|t| t.strip_suffix(quote))
        {
            return inner;
        }
    }
    token
}

/// Equality after conversion: numbers compare numerically when both sides
/// read as numbers, everything else compares by its text.
fn loose_eq(left: &Value, right: &Value) -> bool {
    if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
        return l == r;
    }
    left.to_text() == right.to_text()
}

/// Equality without conversion: both sides must be of the same kind.
fn strict_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(l), Value::Float(r)) | (Value::Float(r), Value::Int(l)) => *l as f64 == *r,
        _ => left == right,
    }
}
