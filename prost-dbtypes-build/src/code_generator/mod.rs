use std::collections::{HashMap, HashSet};
use std::io::{Error, ErrorKind, Result};

use log::{debug, trace};
use proc_macro2::TokenStream;
use prost_types::FileDescriptorProto;
use quote::quote;

use crate::filters::should_generate;
use crate::ident::to_upper_camel;
use crate::message_graph::MessageGraph;
use crate::module::Module;
use crate::Config;

mod wrappers;

/// The output packages whose shared `ProtoValue` has been emitted during the current run.
///
/// Several `.proto` files may declare the same package; their generated units end up in
/// the same Rust module, which must contain exactly one `ProtoValue` definition.
#[derive(Debug, Default)]
pub struct EmittedPackages {
    packages: HashSet<Module>,
}

impl EmittedPackages {
    /// Records `module` as emitted. Returns `false` if it already was.
    pub fn mark(&mut self, module: &Module) -> bool {
        if self.packages.contains(module) {
            return false;
        }
        self.packages.insert(module.clone())
    }
}

pub struct CodeGenerator {
    module: Module,
    prost_path: syn::Path,
    dbtypes_path: syn::Path,
    buf: Vec<TokenStream>,
}

impl CodeGenerator {
    fn new(config: &Config, file: &FileDescriptorProto) -> Result<Self> {
        Ok(Self {
            module: Module::from_protobuf_package_name(file.package()),
            prost_path: parse_crate_path(config.resolve_prost_path())?,
            dbtypes_path: parse_crate_path(config.resolve_dbtypes_path())?,
            buf: Vec::new(),
        })
    }

    /// Generates the wrappers of one file.
    ///
    /// Returns `None` if no message of the file is selected.
    pub fn generate(
        config: &Config,
        file: &FileDescriptorProto,
        emitted: &mut EmittedPackages,
    ) -> Result<Option<TokenStream>> {
        let mut code_gen = CodeGenerator::new(config, file)?;

        debug!(
            "file: {:?}, package: {:?}, module: {}",
            file.name(),
            file.package(),
            code_gen.module
        );

        for node in MessageGraph::from_file(file).iter() {
            if !should_generate(node, config) {
                trace!("  message: {} (skipped)", node.full_name);
                continue;
            }
            debug!("  message: {}", node.full_name);

            if emitted.mark(&code_gen.module) {
                debug!("  shared wrapper for module {}", code_gen.module);
                let shared = code_gen.shared_wrapper();
                code_gen.buf.push(shared);
            }
            let wrapper = code_gen.message_wrapper(node);
            code_gen.buf.push(wrapper);
        }

        if code_gen.buf.is_empty() {
            return Ok(None);
        }
        let items = code_gen.buf;
        Ok(Some(quote! { #(#items)* }))
    }
}

/// Describes every generated type name that clashes with another item of its Rust module.
///
/// A wrapper clashes with a type prost generates into the same module (`Foo` next to a
/// message `FooValue`, or any message named `ProtoValue`) and with another wrapper
/// (`Outer.Inner` next to a message `OuterInner`).
pub fn name_collisions(config: &Config, files: &[FileDescriptorProto]) -> Vec<String> {
    let mut prost_types: HashMap<Module, HashSet<String>> = HashMap::new();
    for file in files {
        let names = prost_types
            .entry(Module::from_protobuf_package_name(file.package()))
            .or_default();
        names.extend(file.message_type.iter().map(|msg| to_upper_camel(msg.name())));
        names.extend(file.enum_type.iter().map(|e| to_upper_camel(e.name())));
    }

    let mut wrapper_names: HashMap<Module, HashSet<String>> = HashMap::new();
    let mut collisions = Vec::new();
    for file in files {
        let module = Module::from_protobuf_package_name(file.package());
        let existing = prost_types.get(&module);
        let clashes = |name: &str| existing.map_or(false, |names| names.contains(name));

        for node in MessageGraph::from_file(file).iter() {
            if !should_generate(node, config) {
                continue;
            }
            let emitted = wrapper_names.entry(module.clone()).or_default();
            if emitted.is_empty() && clashes("ProtoValue") {
                collisions.push(format!(
                    "the shared `ProtoValue` of module {module} clashes with a protobuf type"
                ));
            }
            let name = wrappers::wrapper_name(node);
            if clashes(&name) {
                collisions.push(format!(
                    "wrapper `{name}` of {} clashes with a protobuf type in module {module}",
                    node.full_name
                ));
            } else if !emitted.insert(name.clone()) {
                collisions.push(format!(
                    "wrapper `{name}` of {} clashes with another wrapper in module {module}",
                    node.full_name
                ));
            }
        }
    }
    collisions
}

fn parse_crate_path(path: &str) -> Result<syn::Path> {
    syn::parse_str(path).map_err(|error| {
        Error::new(
            ErrorKind::InvalidInput,
            format!("invalid crate path {path:?}: {error}"),
        )
    })
}
