use prost_types::{DescriptorProto, FileDescriptorProto};

use crate::fully_qualified_name::FullyQualifiedName;

/// A message declared in a `.proto` file, nested or not.
#[derive(Debug, Clone)]
pub struct MessageNode<'a> {
    /// The short name, e.g. `Item`.
    pub name: &'a str,
    /// The protobuf full name, e.g. `test.v1.Container.Item`.
    pub full_name: FullyQualifiedName,
    /// The protobuf package declaring the message.
    pub package: &'a str,
    /// Short names of the enclosing messages, outermost first.
    pub type_path: Vec<&'a str>,
    /// Whether protoc synthesized this message for a `map<K, V>` field.
    pub map_entry: bool,
}

/// The messages of a single file, flattened in depth-first pre-order.
///
/// Top-level messages appear in declaration order, each immediately followed by its
/// nested messages (again in declaration order, recursively). Map entry messages are
/// kept; it is up to the caller to skip them.
pub struct MessageGraph<'a> {
    nodes: Vec<MessageNode<'a>>,
}

impl<'a> MessageGraph<'a> {
    pub fn from_file(file: &'a FileDescriptorProto) -> MessageGraph<'a> {
        let mut graph = MessageGraph { nodes: Vec::new() };
        let package = file.package();
        for msg in &file.message_type {
            graph.add_message(package, &mut Vec::new(), msg);
        }
        graph
    }

    fn add_message(
        &mut self,
        package: &'a str,
        type_path: &mut Vec<&'a str>,
        msg: &'a DescriptorProto,
    ) {
        let name = msg.name();
        let map_entry = msg
            .options
            .as_ref()
            .and_then(|options| options.map_entry)
            .unwrap_or(false);

        self.nodes.push(MessageNode {
            name,
            full_name: FullyQualifiedName::new(package, type_path.as_slice(), name),
            package,
            type_path: type_path.clone(),
            map_entry,
        });

        type_path.push(name);
        for nested in &msg.nested_type {
            self.add_message(package, type_path, nested);
        }
        type_path.pop();
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageNode<'a>> {
        self.nodes.iter()
    }
}
