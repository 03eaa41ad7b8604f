use super::*;

use crate::ident::{to_snake, to_syn_ident, to_upper_camel};
use crate::message_graph::MessageNode;

impl CodeGenerator {
    /// The generic wrapper shared by every message of a package.
    pub(super) fn shared_wrapper(&self) -> TokenStream {
        let prost = &self.prost_path;
        let dbtypes = &self.dbtypes_path;

        quote! {
            /// Stores a protobuf message in a database column as its binary encoding.
            ///
            /// The `*Value` wrappers of this package delegate to this type. A wrapper without a
            /// message stores the encoding of the default message. Scanning `NULL` leaves it
            /// without a message; use `Option<_>` of a wrapper for nullable columns.
            #[derive(Clone, Debug, Default, PartialEq)]
            pub struct ProtoValue<M> {
                msg: ::core::option::Option<M>,
            }

            impl<M> ProtoValue<M> {
                pub const fn new(msg: ::core::option::Option<M>) -> Self {
                    Self { msg }
                }

                pub fn as_message(&self) -> ::core::option::Option<&M> {
                    self.msg.as_ref()
                }

                pub fn into_message(self) -> ::core::option::Option<M> {
                    self.msg
                }
            }

            impl<M> #dbtypes::Scan for ProtoValue<M>
            where
                M: #prost::Message + ::core::default::Default,
            {
                /// Decodes `Bytes`, and `Text` taken as its raw bytes. `NULL` clears the message.
                fn scan(
                    &mut self,
                    src: &#dbtypes::SqlValue,
                ) -> ::core::result::Result<(), #dbtypes::ScanError> {
                    if src.is_null() {
                        self.msg = ::core::option::Option::None;
                        return ::core::result::Result::Ok(());
                    }
                    match src.as_bytes() {
                        ::core::option::Option::Some(bytes) => {
                            let msg = <M as #prost::Message>::decode(bytes)?;
                            self.msg = ::core::option::Option::Some(msg);
                            ::core::result::Result::Ok(())
                        }
                        ::core::option::Option::None => {
                            ::core::result::Result::Err(#dbtypes::ScanError::unsupported(src))
                        }
                    }
                }
            }

            impl<M> #dbtypes::Value for ProtoValue<M>
            where
                M: #prost::Message + ::core::default::Default,
            {
                fn value(&self) -> #dbtypes::SqlValue {
                    let bytes = match &self.msg {
                        ::core::option::Option::Some(msg) => #prost::Message::encode_to_vec(msg),
                        ::core::option::Option::None => {
                            #prost::Message::encode_to_vec(&M::default())
                        }
                    };
                    #dbtypes::SqlValue::Bytes(bytes)
                }
            }
        }
    }

    /// The concrete wrapper of one message, delegating to `ProtoValue`.
    pub(super) fn message_wrapper(&self, node: &MessageNode<'_>) -> TokenStream {
        let dbtypes = &self.dbtypes_path;
        let message = message_path(node);
        let wrapper = to_syn_ident(&wrapper_name(node));
        let doc = format!(" Column wrapper for [`{}`] (`{}`).", message_doc_path(node), node.full_name);

        quote! {
            #[doc = #doc]
            #[derive(Clone, Debug, Default, PartialEq)]
            pub struct #wrapper(ProtoValue<#message>);

            impl #wrapper {
                /// Wraps `msg`. A wrapper built from `None` stores the default message.
                pub const fn new(msg: ::core::option::Option<#message>) -> Self {
                    Self(ProtoValue::new(msg))
                }

                /// Returns the held message.
                pub fn as_message(&self) -> ::core::option::Option<&#message> {
                    self.0.as_message()
                }

                /// Consumes the wrapper, returning the held message.
                pub fn into_message(self) -> ::core::option::Option<#message> {
                    self.0.into_message()
                }
            }

            impl #dbtypes::Scan for #wrapper {
                fn scan(
                    &mut self,
                    src: &#dbtypes::SqlValue,
                ) -> ::core::result::Result<(), #dbtypes::ScanError> {
                    #dbtypes::Scan::scan(&mut self.0, src)
                }
            }

            impl #dbtypes::Value for #wrapper {
                fn value(&self) -> #dbtypes::SqlValue {
                    #dbtypes::Value::value(&self.0)
                }
            }

            impl ::core::convert::From<#message> for #wrapper {
                fn from(msg: #message) -> Self {
                    Self::new(::core::option::Option::Some(msg))
                }
            }
        }
    }
}

/// `Outer.Inner` becomes `OuterInnerValue`.
pub(super) fn wrapper_name(node: &MessageNode<'_>) -> String {
    let mut name: String = node
        .type_path
        .iter()
        .chain(std::iter::once(&node.name))
        .map(|segment| to_upper_camel(segment))
        .collect();
    name.push_str("Value");
    name
}

/// The path of the prost-generated message relative to its package module:
/// `Outer.Inner` lives at `outer::Inner`.
fn message_path(node: &MessageNode<'_>) -> TokenStream {
    let modules = node.type_path.iter().map(|segment| to_syn_ident(&to_snake(segment)));
    let ident = to_syn_ident(&to_upper_camel(node.name));
    quote! { #(#modules::)* #ident }
}

fn message_doc_path(node: &MessageNode<'_>) -> String {
    node.type_path
        .iter()
        .map(|segment| to_snake(segment))
        .chain(std::iter::once(to_upper_camel(node.name)))
        .collect::<Vec<_>>()
        .join("::")
}
