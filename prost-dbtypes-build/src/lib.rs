//! `prost-dbtypes-build` generates database column wrappers for the messages `prost-build`
//! generates.
//!
//! For every selected message `Foo`, the generated code defines a `FooValue` type that stores
//! the message as its binary protobuf encoding and implements the `Scan` and `Value` traits
//! of the `prost-dbtypes` crate. All wrappers of a package delegate to one generic
//! `ProtoValue<M>`, emitted once per package.
//!
//! ## Example
//!
//! Given `src/toolset.proto`:
//!
//! ```proto
//! syntax = "proto3";
//!
//! package toolset.v1;
//!
//! message ToolSetSpec {
//!   repeated string tool_ids = 1;
//!   string name = 2;
//! }
//! ```
//!
//! generate both the messages and their wrappers from the same descriptors in `build.rs`:
//!
//! ```rust,ignore
//! fn main() -> std::io::Result<()> {
//!     let fds = /* a `prost_types::FileDescriptorSet`, e.g. from `protoc -o` */;
//!     prost_build::Config::new().compile_fds(fds.clone())?;
//!     prost_dbtypes_build::Config::new()
//!         .exclude(["InternalNote"])
//!         .compile_fds(fds)
//! }
//! ```
//!
//! and include the wrappers next to the messages of the package:
//!
//! ```rust,ignore
//! pub mod toolset {
//!     pub mod v1 {
//!         include!(concat!(env!("OUT_DIR"), "/toolset.v1.rs"));
//!         include!(concat!(env!("OUT_DIR"), "/toolset/v1/toolset.dbtypes.rs"));
//!     }
//! }
//!
//! use prost_dbtypes::{Scan, Value};
//!
//! let column = toolset::v1::ToolSetSpecValue::from(spec).value();
//! ```
//!
//! ## Selection
//!
//! Wrappers are generated for every message except:
//!
//! - the synthetic entry messages protoc creates for `map<K, V>` fields,
//! - messages outside the package set with [`Config::only_package`],
//! - messages excluded with [`Config::exclude`], by short or full name.
//!
//! Nested messages are selected independently of their parent; the wrapper of
//! `Container.Item` is `ContainerItemValue`.
//!
//! The same generator is available as a protoc plugin, `protoc-gen-prost-dbtypes`.

mod code_generator;
mod config;
mod filters;
mod fully_qualified_name;
mod ident;
mod message_graph;
mod module;
mod plugin;


use std::io::Result;

use prost_types::FileDescriptorSet;

pub use crate::config::{Config, PathLayout};
pub use crate::plugin::compile_request;

/// Header placed at the top of every generated file.
const GENERATED_HEADER: &str = "// This file is @generated by prost-dbtypes-build.\n";

/// A generated source unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFile {
    /// `/`-separated path relative to the output directory.
    pub name: String,
    pub content: String,
}

/// Generates wrappers for every file of `fds` into `OUT_DIR` with the default configuration.
///
/// See [`Config::compile_fds`].
pub fn compile_fds(fds: FileDescriptorSet) -> Result<()> {
    Config::new().compile_fds(fds)
}

#[cfg(feature = "format")]
fn format_file(tokens: proc_macro2::TokenStream) -> Result<String> {
    let file: syn::File = syn::parse2(tokens).map_err(|error| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("generated code does not parse: {error}"),
        )
    })?;
    Ok(format!("{GENERATED_HEADER}{}", prettyplease::unparse(&file)))
}

#[cfg(not(feature = "format"))]
fn format_file(tokens: proc_macro2::TokenStream) -> Result<String> {
    Ok(format!("{GENERATED_HEADER}{tokens}\n"))
}
