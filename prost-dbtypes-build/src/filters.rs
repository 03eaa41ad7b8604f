//! Message selection.

use crate::message_graph::MessageNode;
use crate::Config;

/// Decides whether a column wrapper is generated for `node`.
///
/// - Map entry messages are never selected.
/// - With a package restriction, only messages of exactly that package are selected.
/// - A message is rejected if its short name or its full name is excluded.
///
/// Nesting plays no part: a nested message is selected or rejected on its own merits,
/// regardless of what happens to its parent.
pub fn should_generate(node: &MessageNode<'_>, config: &Config) -> bool {
    if node.map_entry {
        return false;
    }
    if let Some(package) = config.only_package.as_deref() {
        if node.package != package {
            return false;
        }
    }
    let full_name: &str = node.full_name.as_ref();
    !(config.excluded_types.contains(node.name) || config.excluded_types.contains(full_name))
}
