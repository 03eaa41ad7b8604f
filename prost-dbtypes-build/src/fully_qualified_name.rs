use std::fmt;

use itertools::Itertools;

/// The protobuf full name of a message, e.g. `test.v1.Container.Item`.
///
// Invariant: never begins with a '.' (dot)
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct FullyQualifiedName(String);

impl FullyQualifiedName {
    pub fn new(package_string: &str, type_path: &[impl AsRef<str>], message_name: &str) -> Self {
        let package = package_string.trim_matches('.');
        Self(
            std::iter::once(package)
                .chain(type_path.iter().map(|segment| segment.as_ref().trim_matches('.')))
                .chain(std::iter::once(message_name))
                .filter(|segment| !segment.is_empty())
                .join("."),
        )
    }
}

impl AsRef<str> for FullyQualifiedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FullyQualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
