use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataStruct, DeriveInput, Fields, Ident, Type};

use crate::attributes::{FieldAttributes, TypeAttributes};

/// A named field that takes part in reflection.
struct StructField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    attrs: FieldAttributes,
}

/// Implement `Typed`, `Struct`, `Reflect` and `FromReflect` for a struct
/// with named fields.
pub(crate) fn impl_struct(ast: &DeriveInput, data: &DataStruct) -> syn::Result<TokenStream> {
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &ast.ident,
            "only structs with named fields can derive `Reflect`",
        ));
    };

    let type_attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

    let mut fields = Vec::with_capacity(named.named.len());
    let mut base: Option<StructField> = None;
    for field in &named.named {
        let attrs = FieldAttributes::parse_attrs(&field.attrs)?;
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field = StructField {
            ident,
            ty: &field.ty,
            attrs,
        };
        if field.attrs.base {
            if base.is_some() {
                return Err(syn::Error::new_spanned(
                    ident,
                    "at most one field can be marked `base`",
                ));
            }
            base = Some(field);
        } else {
            fields.push(field);
        }
    }

    let rp = crate::path::rp_reflect();
    let ident = &ast.ident;

    let typed_tokens = impl_typed(&rp, &type_attrs, &fields, base.as_ref());
    let struct_tokens = impl_struct_trait(&rp, &fields, base.as_ref());
    let reflect_tokens = impl_reflect(&rp, &type_attrs);

    Ok(quote! {
        impl #rp::info::Typed for #ident {
            #typed_tokens
        }

        impl #rp::ops::Struct for #ident {
            #struct_tokens
        }

        impl #rp::Reflect for #ident {
            #reflect_tokens
        }

        impl #rp::FromReflect for #ident {
            #[inline]
            fn from_reflect(reflect: &dyn #rp::Reflect) -> ::core::option::Option<Self> {
                reflect.downcast_ref::<Self>().cloned()
            }
        }
    })
}

fn impl_typed(
    rp: &syn::Path,
    type_attrs: &TypeAttributes,
    fields: &[StructField],
    base: Option<&StructField>,
) -> TokenStream {
    let named_fields = fields.iter().map(|field| {
        let name = field.ident.to_string();
        let ty = field.ty;
        let copy_name = field
            .attrs
            .copy_name
            .as_ref()
            .map(|name| quote!(.with_copy_name(#name)));
        let skip_copy = field.attrs.skip_copy.then(|| quote!(.with_skip_copy()));
        let constant = field.attrs.constant.then(|| quote!(.with_constant()));
        quote! {
            #rp::info::NamedField::new::<#ty>(#name) #copy_name #skip_copy #constant
        }
    });

    let with_base = base.map(|base| {
        let ty = base.ty;
        quote!(.with_base(<#ty as #rp::info::Typed>::type_info))
    });

    let exclusions = &type_attrs.exclude_fields;
    let with_exclusions =
        (!exclusions.is_empty()).then(|| quote!(.with_exclusions(&[#(#exclusions),*])));

    let construct = &type_attrs.exclude_on_construct;
    let with_construct =
        (!construct.is_empty()).then(|| quote!(.with_construct_exclusions(&[#(#construct),*])));

    let with_default = type_attrs.default.then(|| quote!(.with_default::<Self>()));

    quote! {
        fn type_info() -> &'static #rp::info::TypeInfo {
            static CELL: #rp::impls::NonGenericTypeInfoCell = #rp::impls::NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                #rp::info::TypeInfo::Struct(
                    #rp::info::StructInfo::new::<Self>(&[
                        #(#named_fields),*
                    ])
                    #with_base
                    #with_exclusions
                    #with_construct
                    #with_default
                )
            })
        }
    }
}

fn impl_struct_trait(
    rp: &syn::Path,
    fields: &[StructField],
    base: Option<&StructField>,
) -> TokenStream {
    let own_len = fields.len();
    let indices: Vec<usize> = (0..own_len).collect();
    let idents: Vec<&Ident> = fields.iter().map(|field| field.ident).collect();

    let (base_ref, base_mut, base_len, base_extend) = match base {
        Some(base) => {
            let base = base.ident;
            (
                quote!(index => #rp::ops::Struct::field_at(&self.#base, index - #own_len)),
                quote!(index => #rp::ops::Struct::field_at_mut(&mut self.#base, index - #own_len)),
                quote!(+ #rp::ops::Struct::field_len(&self.#base)),
                quote!(fields.extend(#rp::ops::Struct::fields_mut(&mut self.#base));),
            )
        }
        None => (
            quote!(_ => ::core::option::Option::None),
            quote!(_ => ::core::option::Option::None),
            quote!(),
            quote!(),
        ),
    };

    quote! {
        fn field_at(&self, index: usize) -> ::core::option::Option<&dyn #rp::Reflect> {
            match index {
                #(#indices => ::core::option::Option::Some(#rp::Reflect::as_reflect(&self.#idents)),)*
                #base_ref,
            }
        }

        fn field_at_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn #rp::Reflect> {
            match index {
                #(#indices => ::core::option::Option::Some(#rp::Reflect::as_reflect_mut(&mut self.#idents)),)*
                #base_mut,
            }
        }

        #[inline]
        fn field_len(&self) -> usize {
            #own_len #base_len
        }

        #[allow(unused_mut)]
        fn fields_mut(&mut self) -> ::std::vec::Vec<&mut dyn #rp::Reflect> {
            let mut fields: ::std::vec::Vec<&mut dyn #rp::Reflect> = ::std::vec![
                #(#rp::Reflect::as_reflect_mut(&mut self.#idents)),*
            ];
            #base_extend
            fields
        }
    }
}

fn impl_reflect(rp: &syn::Path, type_attrs: &TypeAttributes) -> TokenStream {
    let reset_tokens = type_attrs.default.then(|| {
        quote! {
            #[inline]
            fn reset(&mut self) -> bool {
                *self = ::core::default::Default::default();
                true
            }
        }
    });

    let common = crate::enum_kind::common_reflect_tokens(rp, quote!(Struct));

    quote! {
        #common

        fn reflect_partial_eq(&self, other: &dyn #rp::Reflect) -> ::core::option::Option<bool> {
            let ::core::option::Option::Some(other) = other.downcast_ref::<Self>() else {
                return ::core::option::Option::Some(false);
            };
            let len = #rp::ops::Struct::field_len(self);
            for index in 0..len {
                let a = #rp::ops::Struct::field_at(self, index)?;
                let b = #rp::ops::Struct::field_at(other, index)?;
                if a.reflect_partial_eq(b) != ::core::option::Option::Some(true) {
                    return ::core::option::Option::Some(false);
                }
            }
            ::core::option::Option::Some(true)
        }

        #reset_tokens
    }
}
