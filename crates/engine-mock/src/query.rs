use std::sync::Arc;

use renderpath::QueryError;

use crate::node::{Content, Element, MockDocument, MockNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Test {
    Name(String),
    AnyElement,
    Attribute(String),
    Text,
}

#[derive(Debug)]
struct Step {
    axis: Axis,
    test: Test,
}

/// Evaluation context: the document node sits above the root element so that
/// `/a` selects a root named `a` and `//a` finds it as a descendant.
#[derive(Clone)]
enum Context {
    Document,
    Element(Arc<Element>),
    Attribute { name: String, value: String },
    Text(Arc<str>),
}

impl Context {
    fn into_node(self) -> Option<MockNode> {
        match self {
            Context::Document => None,
            Context::Element(element) => Some(MockNode::Element(element)),
            Context::Attribute { name, value } => Some(MockNode::Attribute { name, value }),
            Context::Text(text) => Some(MockNode::Text(text)),
        }
    }
}

/// Evaluates the supported expression subset against a document, returning
/// matches in document order. Expressions outside the subset are a
/// `QueryError`; a valid expression with no matches is an empty vector.
pub(crate) fn find_nodes(
    expression: &str,
    document: &MockDocument,
) -> Result<Vec<MockNode>, QueryError> {
    let steps = parse_steps(expression)?;

    let mut current = vec![Context::Document];
    for step in &steps {
        let mut next = Vec::new();
        for context in &current {
            apply_step(context, step, document, &mut next);
        }
        current = next;
    }

    let mut nodes: Vec<MockNode> = Vec::new();
    for context in current {
        if let Some(node) = context.into_node() {
            // Nested descendant steps can reach the same node twice.
            if !nodes.iter().any(|seen| same_node(seen, &node)) {
                nodes.push(node);
            }
        }
    }
    Ok(nodes)
}

fn same_node(a: &MockNode, b: &MockNode) -> bool {
    match (a, b) {
        (MockNode::Element(a), MockNode::Element(b)) => Arc::ptr_eq(a, b),
        (MockNode::Text(a), MockNode::Text(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

fn apply_step(context: &Context, step: &Step, document: &MockDocument, out: &mut Vec<Context>) {
    match step.axis {
        Axis::Child => select_from(context, &step.test, document, out),
        Axis::Descendant => {
            for base in descendant_or_self(context, document) {
                select_from(&base, &step.test, document, out);
            }
        }
    }
}

fn select_from(context: &Context, test: &Test, document: &MockDocument, out: &mut Vec<Context>) {
    match context {
        Context::Document => {
            let root = document.root();
            let matches = match test {
                Test::Name(name) => root.name() == name,
                Test::AnyElement => true,
                Test::Attribute(_) | Test::Text => false,
            };
            if matches {
                out.push(Context::Element(Arc::clone(root)));
            }
        }
        Context::Element(element) => match test {
            Test::Name(name) => {
                for child in child_elements(element) {
                    if child.name() == name {
                        out.push(Context::Element(Arc::clone(child)));
                    }
                }
            }
            Test::AnyElement => {
                for child in child_elements(element) {
                    out.push(Context::Element(Arc::clone(child)));
                }
            }
            Test::Attribute(name) => {
                for (key, value) in &element.attributes {
                    if key == name {
                        out.push(Context::Attribute { name: key.clone(), value: value.clone() });
                    }
                }
            }
            Test::Text => {
                for child in &element.children {
                    if let Content::Text(text) = child {
                        out.push(Context::Text(Arc::clone(text)));
                    }
                }
            }
        },
        Context::Attribute { .. } | Context::Text(_) => {}
    }
}

fn child_elements(element: &Element) -> impl Iterator<Item = &Arc<Element>> {
    element.children.iter().filter_map(|child| match child {
        Content::Element(element) => Some(element),
        Content::Text(_) => None,
    })
}

fn descendant_or_self(context: &Context, document: &MockDocument) -> Vec<Context> {
    let mut out = vec![context.clone()];
    match context {
        Context::Document => {
            out.push(Context::Element(Arc::clone(document.root())));
            collect_descendants(document.root(), &mut out);
        }
        Context::Element(element) => collect_descendants(element, &mut out),
        Context::Attribute { .. } | Context::Text(_) => {}
    }
    out
}

fn collect_descendants(element: &Arc<Element>, out: &mut Vec<Context>) {
    for child in child_elements(element) {
        out.push(Context::Element(Arc::clone(child)));
        collect_descendants(child, out);
    }
}

fn parse_steps(expression: &str) -> Result<Vec<Step>, QueryError> {
    let mut steps = Vec::new();
    let mut rest = expression;

    // A relative expression is evaluated from the document node as well; the
    // helper always queries whole payloads.
    let mut axis = if let Some(stripped) = rest.strip_prefix("//") {
        rest = stripped;
        Axis::Descendant
    } else if let Some(stripped) = rest.strip_prefix('/') {
        rest = stripped;
        Axis::Child
    } else {
        Axis::Child
    };

    loop {
        let (token, remainder) = match rest.find('/') {
            Some(position) => (&rest[..position], &rest[position..]),
            None => (rest, ""),
        };
        steps.push(Step { axis, test: parse_test(token, expression)? });

        if remainder.is_empty() {
            break;
        }
        if let Some(stripped) = remainder.strip_prefix("//") {
            rest = stripped;
            axis = Axis::Descendant;
        } else {
            rest = &remainder[1..];
            axis = Axis::Child;
        }
    }

    Ok(steps)
}

fn parse_test(token: &str, expression: &str) -> Result<Test, QueryError> {
    if token == "text()" {
        return Ok(Test::Text);
    }
    if token == "*" {
        return Ok(Test::AnyElement);
    }
    if let Some(name) = token.strip_prefix('@') {
        return if is_name(name) {
            Ok(Test::Attribute(name.to_owned()))
        } else {
            Err(unsupported(expression))
        };
    }
    if is_name(token) { Ok(Test::Name(token.to_owned())) } else { Err(unsupported(expression)) }
}

fn is_name(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

fn unsupported(expression: &str) -> QueryError {
    QueryError::new(format!("unsupported or malformed expression: {expression}"))
}
