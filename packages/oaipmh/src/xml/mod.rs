//! XML utilities: path queries, DOM helpers and the writer target tree.

use std::collections::BTreeMap;

mod builder;
mod path;
mod utils;

pub use builder::{XmlContent, XmlElement};
pub use path::{PathExpr, PathQuery, PathValue};
pub use utils::{find_child_ns, get_text, is_element_ns};

/// Mapping from namespace prefix to namespace URI.
pub type Namespaces = BTreeMap<String, String>;
