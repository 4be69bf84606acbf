//! See [`Reflect`](derive_reflect).
#![cfg_attr(docsrs, feature(doc_cfg))]

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod enum_kind;
mod path;
mod struct_kind;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` implements `Typed`, `Reflect` and `FromReflect`, plus
/// `Struct` for structs with named fields or `Enum` for unit-only enums.
///
/// The type must also implement `Clone`, `serde::Serialize` and
/// `serde::Deserialize`. Generic types are not supported.
///
/// ## Type Attributes
///
/// - `default`: the type implements `Default`, which enables `reset` and
///   lets the copier construct it as a destination.
/// - `exclude_fields("a", "b")`: names never copied, whether the type is the
///   source or the destination of a copy.
/// - `exclude_on_construct("a")`: names not copied when the type is the
///   destination.
///
/// ## Field Attributes
///
/// - `copy_name = "name"`: match the field on `name` instead of its own name.
/// - `skip_copy`: never copy this field.
/// - `constant`: the field holds a constant and is never copied.
/// - `base`: the field plays the role of a superclass. Its fields are
///   flattened after the struct's own fields, and the field itself is hidden.
///   At most one field can be marked.
///
/// ```rust, ignore
/// #[derive(Reflect, Clone, Default, Serialize, Deserialize)]
/// #[reflect(default, exclude_on_construct("id"))]
/// struct Customer {
///     #[reflect(base)]
///     entity: Entity,
///     #[reflect(copy_name = "displayName")]
///     name: String,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    if !ast.generics.params.is_empty() {
        return syn::Error::new_spanned(&ast.generics, "generic types cannot derive `Reflect`")
            .into_compile_error()
            .into();
    }

    let result = match &ast.data {
        Data::Struct(data) => struct_kind::impl_struct(&ast, data),
        Data::Enum(data) => enum_kind::impl_enum(&ast, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &ast.ident,
            "unions cannot derive `Reflect`",
        )),
    };

    match result {
        Ok(tokens) => TokenStream::from(quote! {
            const _: () = {
                #tokens
            };
        }),
        Err(err) => err.into_compile_error().into(),
    }
}
