//! Namespace-aware path expressions over `roxmltree` nodes.
//!
//! Supports the XPath 1.0 subset that metadata schemas are written in:
//! child and descendant steps, `.`/`..`, name tests with optional
//! prefixes, `text()`, `node()`, attribute steps, positional predicates
//! and the `string()`, `normalize-space()` and `count()` functions.

use std::fmt;

use roxmltree::Node;

use super::Namespaces;
use crate::config::XML_NAMESPACE;
use crate::error::PathError;

/// Raw result of evaluating a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathValue {
    /// String values of the selected nodes, in document order.
    Sequence(Vec<String>),
    /// Result of a function call such as `string(...)` or `count(...)`.
    Scalar(String),
}

impl PathValue {
    /// Check if the result carries no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Sequence(items) => items.is_empty(),
            Self::Scalar(value) => value.is_empty(),
        }
    }
}

/// Capability of evaluating path expressions against an XML element.
///
/// Field readers only depend on this trait, so any tree that can answer
/// path queries can be read.
pub trait PathQuery {
    /// Evaluate `expression` with the given namespace bindings.
    fn query(&self, expression: &str, namespaces: &Namespaces) -> Result<PathValue, PathError>;
}

impl PathQuery for Node<'_, '_> {
    fn query(&self, expression: &str, namespaces: &Namespaces) -> Result<PathValue, PathError> {
        PathExpr::parse(expression)?.evaluate(*self, namespaces)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    DescendantOrSelf,
    SelfNode,
    Parent,
    Attribute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeTest {
    Name {
        prefix: Option<String>,
        local: String,
    },
    Wildcard {
        prefix: Option<String>,
    },
    Text,
    AnyNode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    test: NodeTest,
    position: Option<usize>,
}

impl Step {
    fn new(axis: Axis, test: NodeTest) -> Self {
        Self {
            axis,
            test,
            position: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LocationPath {
    absolute: bool,
    steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Function {
    String,
    NormalizeSpace,
    Count,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "normalize-space" => Some(Self::NormalizeSpace),
            "count" => Some(Self::Count),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Body {
    Path(LocationPath),
    Call(Function, Option<LocationPath>),
}

/// A compiled path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    source: String,
    body: Body,
}

impl PathExpr {
    /// Compile a path expression.
    ///
    /// # Examples
    /// ```
    /// use regelrecht_oaipmh::xml::PathExpr;
    ///
    /// assert!(PathExpr::parse("oai_dc:dc/dc:title/text()").is_ok());
    /// assert!(PathExpr::parse("count(dc:title)").is_ok());
    /// assert!(PathExpr::parse("dc:title[").is_err());
    /// ```
    pub fn parse(expression: &str) -> Result<Self, PathError> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(PathError::EmptyExpression);
        }

        let mut parser = Parser::new(trimmed);
        let body = parser.parse_body()?;
        if parser.peek().is_some() {
            return Err(parser.error("unexpected trailing input"));
        }

        let paths: Vec<&LocationPath> = match &body {
            Body::Path(path) => vec![path],
            Body::Call(_, arg) => arg.iter().collect(),
        };
        for path in paths {
            let attribute_before_end = path
                .steps
                .iter()
                .rev()
                .skip(1)
                .any(|s| s.axis == Axis::Attribute);
            if attribute_before_end {
                return Err(PathError::AttributeNotLast(trimmed.to_string()));
            }
        }

        Ok(Self {
            source: trimmed.to_string(),
            body,
        })
    }

    /// The expression text this was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against a context node.
    pub fn evaluate(
        &self,
        context: Node<'_, '_>,
        namespaces: &Namespaces,
    ) -> Result<PathValue, PathError> {
        self.check_prefixes(namespaces)?;

        match &self.body {
            Body::Path(path) => Ok(PathValue::Sequence(
                select(path, context, namespaces)
                    .iter()
                    .map(Item::string_value)
                    .collect(),
            )),
            Body::Call(function, arg) => {
                let items = match arg {
                    Some(path) => select(path, context, namespaces),
                    None => vec![Item::Node(context)],
                };
                let first = || items.first().map(Item::string_value).unwrap_or_default();
                let value = match function {
                    Function::String => first(),
                    Function::NormalizeSpace => {
                        first().split_whitespace().collect::<Vec<_>>().join(" ")
                    }
                    Function::Count => items.len().to_string(),
                };
                Ok(PathValue::Scalar(value))
            }
        }
    }

    /// Fail on the first prefix the table does not bind, before touching the tree.
    fn check_prefixes(&self, namespaces: &Namespaces) -> Result<(), PathError> {
        let path = match &self.body {
            Body::Path(path) => Some(path),
            Body::Call(_, arg) => arg.as_ref(),
        };
        let steps = path.map(|p| p.steps.as_slice()).unwrap_or_default();
        for step in steps {
            let prefix = match &step.test {
                NodeTest::Name { prefix, .. } | NodeTest::Wildcard { prefix } => prefix.as_deref(),
                NodeTest::Text | NodeTest::AnyNode => None,
            };
            if let Some(prefix) = prefix {
                if bound_namespace(Some(prefix), namespaces).is_none() {
                    return Err(PathError::UnknownPrefix(prefix.to_string()));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A selected node or attribute value.
enum Item<'a, 'input> {
    Node(Node<'a, 'input>),
    Attribute(&'a str),
}

impl Item<'_, '_> {
    fn string_value(&self) -> String {
        match self {
            Self::Attribute(value) => (*value).to_string(),
            Self::Node(node) if node.is_element() || node.is_root() => node
                .descendants()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect(),
            Self::Node(node) => node.text().unwrap_or_default().to_string(),
        }
    }
}

fn select<'a, 'input>(
    path: &LocationPath,
    context: Node<'a, 'input>,
    namespaces: &Namespaces,
) -> Vec<Item<'a, 'input>> {
    let start = if path.absolute {
        context.document().root()
    } else {
        context
    };
    let mut current = vec![start];

    for step in &path.steps {
        if step.axis == Axis::Attribute {
            // Attribute steps are always last, see `PathExpr::parse`.
            return current
                .iter()
                .flat_map(|node| {
                    let matching: Vec<_> = node
                        .attributes()
                        .filter(|attr| {
                            matches_name(&step.test, attr.name(), attr.namespace(), namespaces)
                        })
                        .map(|attr| Item::Attribute(attr.value()))
                        .collect();
                    pick_position(matching, step.position)
                })
                .collect();
        }

        let mut next: Vec<Node<'a, 'input>> = Vec::new();
        for node in &current {
            let candidates: Vec<_> = axis_nodes(*node, step.axis)
                .into_iter()
                .filter(|n| matches_node(&step.test, *n, namespaces))
                .collect();
            next.extend(pick_position(candidates, step.position));
        }
        next.sort_by_key(|n| n.id().get());
        next.dedup_by_key(|n| n.id());
        current = next;
    }

    current.into_iter().map(Item::Node).collect()
}

fn axis_nodes<'a, 'input>(node: Node<'a, 'input>, axis: Axis) -> Vec<Node<'a, 'input>> {
    match axis {
        Axis::Child => node.children().collect(),
        Axis::DescendantOrSelf => node.descendants().collect(),
        Axis::SelfNode => vec![node],
        Axis::Parent => node.parent().into_iter().collect(),
        Axis::Attribute => Vec::new(),
    }
}

fn pick_position<T>(items: Vec<T>, position: Option<usize>) -> Vec<T> {
    match position {
        None => items,
        // Positions are 1-based; `[0]` selects nothing.
        Some(n) => n
            .checked_sub(1)
            .and_then(|index| items.into_iter().nth(index))
            .into_iter()
            .collect(),
    }
}

fn matches_node(test: &NodeTest, node: Node<'_, '_>, namespaces: &Namespaces) -> bool {
    match test {
        NodeTest::Text => node.is_text(),
        NodeTest::AnyNode => true,
        NodeTest::Name { .. } | NodeTest::Wildcard { .. } => {
            node.is_element()
                && matches_name(
                    test,
                    node.tag_name().name(),
                    node.tag_name().namespace(),
                    namespaces,
                )
        }
    }
}

fn matches_name(
    test: &NodeTest,
    local: &str,
    namespace: Option<&str>,
    namespaces: &Namespaces,
) -> bool {
    match test {
        NodeTest::Name { prefix, local: want } => {
            want == local && bound_namespace(prefix.as_deref(), namespaces) == namespace
        }
        NodeTest::Wildcard { prefix: None } => true,
        NodeTest::Wildcard { prefix } => {
            bound_namespace(prefix.as_deref(), namespaces) == namespace
        }
        NodeTest::Text | NodeTest::AnyNode => false,
    }
}

/// Namespace URI a name test requires; unprefixed names require none.
///
/// The `xml` prefix is always bound, as in XPath.
fn bound_namespace<'n>(prefix: Option<&str>, namespaces: &'n Namespaces) -> Option<&'n str> {
    let prefix = prefix?;
    namespaces
        .get(prefix)
        .map(String::as_str)
        .or_else(|| (prefix == "xml").then_some(XML_NAMESPACE))
}

struct Parser<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Parser<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn error(&self, message: &str) -> PathError {
        PathError::Syntax {
            expression: self.src.to_string(),
            position: self.pos,
            message: message.to_string(),
        }
    }

    fn parse_body(&mut self) -> Result<Body, PathError> {
        let name_len = self
            .rest()
            .find(|c: char| !(c.is_ascii_alphabetic() || c == '-'))
            .unwrap_or(self.rest().len());
        let name = &self.rest()[..name_len];

        if let Some(function) = Function::from_name(name) {
            if self.rest()[name_len..].starts_with('(') {
                self.pos += name_len + 1;
                let arg = if self.peek() == Some(')') {
                    None
                } else {
                    Some(self.parse_location_path()?)
                };
                if !self.eat(")") {
                    return Err(self.error("expected ')'"));
                }
                if function == Function::Count && arg.is_none() {
                    return Err(self.error("count() requires an argument"));
                }
                return Ok(Body::Call(function, arg));
            }
        }

        Ok(Body::Path(self.parse_location_path()?))
    }

    fn parse_location_path(&mut self) -> Result<LocationPath, PathError> {
        let mut steps = Vec::new();
        let absolute = if self.eat("//") {
            steps.push(Step::new(Axis::DescendantOrSelf, NodeTest::AnyNode));
            true
        } else {
            self.eat("/")
        };

        // A lone "/" selects the document root.
        if absolute && steps.is_empty() && matches!(self.peek(), None | Some(')')) {
            return Ok(LocationPath { absolute, steps });
        }

        loop {
            steps.push(self.parse_step()?);

            match self.peek() {
                None | Some(')') => break,
                _ if self.eat("//") => {
                    steps.push(Step::new(Axis::DescendantOrSelf, NodeTest::AnyNode));
                }
                _ if self.eat("/") => {}
                _ => return Err(self.error("expected '/' between steps")),
            }
        }

        Ok(LocationPath { absolute, steps })
    }

    fn parse_step(&mut self) -> Result<Step, PathError> {
        if self.eat("..") {
            return Ok(Step::new(Axis::Parent, NodeTest::AnyNode));
        }
        if self.eat(".") {
            return Ok(Step::new(Axis::SelfNode, NodeTest::AnyNode));
        }

        let axis = if self.eat("@") {
            Axis::Attribute
        } else {
            Axis::Child
        };

        let test = self.parse_node_test()?;
        if axis == Axis::Attribute && matches!(test, NodeTest::Text | NodeTest::AnyNode) {
            return Err(self.error("attribute step needs a name test"));
        }

        let mut step = Step::new(axis, test);
        if self.eat("[") {
            let digits_len = self
                .rest()
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(self.rest().len());
            if digits_len == 0 {
                return Err(self.error("expected a position in predicate"));
            }
            let position = self.rest()[..digits_len]
                .parse::<usize>()
                .map_err(|_| self.error("position out of range"))?;
            self.pos += digits_len;
            if !self.eat("]") {
                return Err(self.error("unterminated predicate"));
            }
            step.position = Some(position);
        }

        Ok(step)
    }

    fn parse_node_test(&mut self) -> Result<NodeTest, PathError> {
        if self.eat("*") {
            return Ok(NodeTest::Wildcard { prefix: None });
        }

        let name = self.parse_ncname()?;

        if self.eat("()") {
            return match name {
                "text" => Ok(NodeTest::Text),
                "node" => Ok(NodeTest::AnyNode),
                _ => Err(self.error("unknown node test")),
            };
        }

        if self.eat(":") {
            let prefix = Some(name.to_string());
            if self.eat("*") {
                return Ok(NodeTest::Wildcard { prefix });
            }
            let local = self.parse_ncname()?;
            return Ok(NodeTest::Name {
                prefix,
                local: local.to_string(),
            });
        }

        Ok(NodeTest::Name {
            prefix: None,
            local: name.to_string(),
        })
    }

    fn parse_ncname(&mut self) -> Result<&'s str, PathError> {
        let rest = self.rest();
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if c.is_alphabetic() || c == '_' => {}
            _ => return Err(self.error("expected a name")),
        }
        let len = chars
            .find(|(_, c)| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.')))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += len;
        Ok(&rest[..len])
    }
}
