//! Namespace-aware helpers for walking parsed DOM trees.

use roxmltree::Node;

/// Check if a node is an element with the given namespace and local name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use regelrecht_oaipmh::xml::is_element_ns;
///
/// let xml = r#"<r xmlns="urn:a"><item/></r>"#;
/// let doc = Document::parse(xml).unwrap();
/// let item = doc.root_element().first_element_child().unwrap();
/// assert!(is_element_ns(item, "urn:a", "item"));
/// assert!(!is_element_ns(item, "urn:b", "item"));
/// ```
pub fn is_element_ns(node: Node<'_, '_>, namespace: &str, local: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local
        && node.tag_name().namespace() == Some(namespace)
}

/// Find the first child element with the given namespace and local name.
pub fn find_child_ns<'a, 'input>(
    node: Node<'a, 'input>,
    namespace: &str,
    local: &str,
) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| is_element_ns(*child, namespace, local))
}

/// Get the text content of a node, trimmed.
///
/// # Returns
/// Trimmed text content, or empty string if no text
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
