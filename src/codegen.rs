//! Go `text/template` emission.
//!
//! The walk is pre-order and threads a [`Scope`] down the recursion. A scope
//! is never mutated in place: entering a loop or passing an assignment
//! produces a new one for whatever is emitted after that point.

use crate::ast::*;
use std::collections::HashSet;

/// Synthetic `range` index variable.
const INDEX_VAR: &str = "$_idx";

#[derive(Debug, Clone, Default)]
pub struct Scope<'a> {
    /// Item name of the innermost loop. `Some` also means `$loop` is bound.
    loop_item: Option<&'a str>,
    assigned: HashSet<&'a str>,
}

impl<'a> Scope<'a> {
    pub fn entering_loop(&self, item: &'a str) -> Self {
        Self {
            loop_item: Some(item),
            assigned: self.assigned.clone(),
        }
    }

    pub fn assigning(&self, name: &'a str) -> Self {
        let mut assigned = self.assigned.clone();
        assigned.insert(name);
        Self {
            loop_item: self.loop_item,
            assigned,
        }
    }

    pub fn is_assigned(&self, name: &str) -> bool {
        self.assigned.contains(name)
    }

    pub fn in_loop(&self) -> bool {
        self.loop_item.is_some()
    }

    /// Render a dotted path as a Go template reference.
    ///
    /// Priority: the loop item (`.` is the element inside `range`), loop
    /// metadata, assigned variables, then the top-level data context.
    pub fn resolve(&self, base: &str) -> String {
        if let Some(item) = self.loop_item {
            if base == item {
                return ".".to_string();
            }
            if let Some(field) = base.strip_prefix(item).and_then(|r| r.strip_prefix('.')) {
                return format!(".{field}");
            }
            if let Some(field) = base.strip_prefix("loop.") {
                return format!("$loop.{field}");
            }
        }
        if self.is_assigned(base) {
            return format!("${base}");
        }
        if self.in_loop() {
            // `.` is rebound inside `range`; reach the root through `$`.
            format!("$.{base}")
        } else {
            format!(".{base}")
        }
    }
}

/// Anchor a dot-relative reference at the template root so it still
/// points at the same value inside a `range` body.
fn anchored(reference: &str) -> String {
    match reference.strip_prefix('.') {
        Some(path) => format!("$.{path}"),
        None => reference.to_string(),
    }
}

pub fn generate(root: &Root) -> String {
    let mut out = String::new();
    emit_body(&root.children, Scope::default(), &mut out);
    tracing::debug!(bytes = out.len(), "generated template");
    out
}

/// Emit siblings in order. Assignments extend the scope for the siblings
/// (and their descendants) that follow them.
fn emit_body<'a>(nodes: &'a [Node], mut scope: Scope<'a>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Assignment { name, value } => {
                let op = if scope.is_assigned(name) { "=" } else { ":=" };
                out.push_str(&format!("{{{{ ${name} {op} {value} }}}}"));
                scope = scope.assigning(name);
            }
            _ => emit_node(node, &scope, out),
        }
    }
}

fn emit_node<'a>(node: &'a Node, scope: &Scope<'a>, out: &mut String) {
    match node {
        Node::Text(content) => out.push_str(content),
        Node::Variable(variable) => out.push_str(&emit_variable(variable, scope)),
        Node::Conditional {
            condition,
            body,
            else_body,
        } => {
            out.push_str(&format!("{{{{ if {condition} }}}}"));
            emit_body(body, scope.clone(), out);
            if !else_body.is_empty() {
                out.push_str("{{ else }}");
                emit_body(else_body, scope.clone(), out);
            }
            out.push_str("{{ end }}");
        }
        Node::Iteration { item, list, body } => {
            let list_ref = scope.resolve(list);
            let len = format!("(len {})", anchored(&list_ref));
            out.push_str(&format!("{{{{ range {INDEX_VAR}, ${item} := {list_ref} }}}}"));
            out.push_str(&format!(
                "{{{{ $loop := dict \"index\" (add {i} 1) \"index0\" {i} \"first\" (eq {i} 0) \
                 \"last\" (eq (add {i} 1) {len}) \"length\" {len} }}}}",
                i = INDEX_VAR,
            ));
            emit_body(body, scope.entering_loop(item), out);
            out.push_str("{{ end }}");
        }
        Node::Assignment { .. } => emit_body(std::slice::from_ref(node), scope.clone(), out),
    }
}

/// Filters are written outermost first, so `x | a | b` becomes `b a .x`.
fn emit_variable(variable: &Variable, scope: &Scope<'_>) -> String {
    let reference = scope.resolve(&variable.base);
    let mut words: Vec<&str> = variable
        .filters
        .iter()
        .rev()
        .map(|filter| filter.name.as_str())
        .collect();
    words.push(&reference);
    format!("{{{{ {} }}}}", words.join(" "))
}
