//! Dot-path lookup against nested template data.

use std::borrow::Cow;

use super::value::Value;

/// Resolve a dot-delimited path such as `post.tags.0.name` against `root`.
///
/// Returns `None` when a segment is missing or the walk reaches a scalar.
/// Lazy values met along the way are evaluated so the walk can continue.
pub fn resolve_path<'v>(root: &'v Value, path: &str) -> Option<Cow<'v, Value>> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    path.split('.')
        .try_fold(Cow::Borrowed(root), |current, segment| step(current, segment))
}

fn step<'v>(current: Cow<'v, Value>, segment: &str) -> Option<Cow<'v, Value>> {
    match current {
        Cow::Borrowed(Value::Lazy(lazy)) => lazy.get().force().into_child(segment).map(Cow::Owned),
        Cow::Borrowed(value) => value.child(segment).map(Cow::Borrowed),
        Cow::Owned(value) => value.force().into_child(segment).map(Cow::Owned),
    }
}

/// One layer of evaluation context.
///
/// Iteration pushes a child scope per element, linked to the scope it was
/// entered from. Lookups in a child never fall through to the parent; the
/// reserved `_parent` segment reaches it explicitly.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    data: &'a Value,
    parent: Option<&'a Scope<'a>>,
    index: Option<usize>,
}

impl<'a> Scope<'a> {
    /// Top-level scope over the template context.
    pub fn root(data: &'a Value) -> Self {
        Self {
            data,
            parent: None,
            index: None,
        }
    }

    /// Scope for the element at `index` of a sequence iterated from `self`.
    pub fn child<'s>(&'s self, item: &'s Value, index: usize) -> Scope<'s> {
        Scope {
            data: item,
            parent: Some(self),
            index: Some(index),
        }
    }

    /// Resolve a path in this scope.
    ///
    /// Besides ordinary keys, the first segment may be `this` (the current
    /// element), `_index` (its position) or `_parent` (the enclosing scope).
    pub fn resolve(&self, path: &str) -> Option<Cow<'a, Value>> {
        let path = path.trim();
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };

        let base = match head {
            "this" => Cow::Borrowed(self.data),
            "_index" => Cow::Owned(Value::from(self.index?)),
            "_parent" => {
                let parent = self.parent?;
                return match rest {
                    Some(rest) => parent.resolve(rest),
                    None => Some(Cow::Borrowed(parent.data)),
                };
            }
            _ => return resolve_path(self.data, path),
        };

        match rest {
            Some(rest) => rest.split('.').try_fold(base, step),
            None => Some(base),
        }
    }
}
