use std::fmt;

use itertools::Itertools;

use crate::ident::to_snake;

/// A Rust module path for a Protobuf package.
///
/// This is the output package identity: every file whose package maps to the same module
/// shares one `ProtoValue` definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Module {
    components: Vec<String>,
}

impl Module {
    /// Construct a module path from a Protobuf package name.
    ///
    /// Constituent parts are automatically converted to snake case in order to follow
    /// Rust module naming conventions.
    pub fn from_protobuf_package_name(name: &str) -> Self {
        Self {
            components: name
                .split('.')
                .filter(|s| !s.is_empty())
                .map(to_snake)
                .collect(),
        }
    }

    /// An iterator over the parts of the path.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|s| s.as_str())
    }

    /// The `/`-separated directory, relative to the output root, holding generated files of
    /// this module.
    ///
    /// Raw identifier prefixes are dropped, so `r#type` lives in `type/`.
    pub fn to_dir_name(&self) -> String {
        self.parts()
            .map(|part| part.trim_start_matches("r#"))
            .join("/")
    }

    /// Whether the module's path contains any components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("crate");
        }
        let mut parts = self.parts();
        if let Some(first) = parts.next() {
            f.write_str(first)?;
        }
        for part in parts {
            f.write_str("::")?;
            f.write_str(part)?;
        }
        Ok(())
    }
}
