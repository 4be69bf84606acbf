use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, DeriveInput, Fields};

use crate::attributes::TypeAttributes;

/// Implement `Typed`, `Enum`, `Reflect` and `FromReflect` for a unit-only enum.
pub(crate) fn impl_enum(ast: &DeriveInput, data: &DataEnum) -> syn::Result<TokenStream> {
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "only unit variants are supported by `Reflect`",
            ));
        }
    }

    let type_attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

    let rp = crate::path::rp_reflect();
    let ident = &ast.ident;
    let variants: Vec<_> = data.variants.iter().map(|variant| &variant.ident).collect();
    let names: Vec<String> = variants.iter().map(ToString::to_string).collect();
    let indices: Vec<usize> = (0..variants.len()).collect();

    let with_default = type_attrs.default.then(|| quote!(.with_default::<Self>()));
    let reset_tokens = type_attrs.default.then(|| {
        quote! {
            #[inline]
            fn reset(&mut self) -> bool {
                *self = ::core::default::Default::default();
                true
            }
        }
    });

    let common = common_reflect_tokens(&rp, quote!(Enum));

    Ok(quote! {
        impl #rp::info::Typed for #ident {
            fn type_info() -> &'static #rp::info::TypeInfo {
                static CELL: #rp::impls::NonGenericTypeInfoCell = #rp::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    #rp::info::TypeInfo::Enum(
                        #rp::info::EnumInfo::new::<Self>(
                            &[#(#names),*],
                            |name| match name {
                                #(#names => ::core::option::Option::Some(
                                    ::std::boxed::Box::new(Self::#variants) as ::std::boxed::Box<dyn #rp::Reflect>
                                ),)*
                                _ => ::core::option::Option::None,
                            },
                        )
                        #with_default
                    )
                })
            }
        }

        impl #rp::ops::Enum for #ident {
            fn variant_name(&self) -> &'static str {
                match self {
                    #(Self::#variants => #names,)*
                }
            }

            fn variant_index(&self) -> usize {
                match self {
                    #(Self::#variants => #indices,)*
                }
            }
        }

        impl #rp::Reflect for #ident {
            #common

            fn reflect_partial_eq(&self, other: &dyn #rp::Reflect) -> ::core::option::Option<bool> {
                ::core::option::Option::Some(other.downcast_ref::<Self>().is_some_and(|other| {
                    #rp::ops::Enum::variant_index(self) == #rp::ops::Enum::variant_index(other)
                }))
            }

            #reset_tokens
        }

        impl #rp::FromReflect for #ident {
            #[inline]
            fn from_reflect(reflect: &dyn #rp::Reflect) -> ::core::option::Option<Self> {
                reflect.downcast_ref::<Self>().cloned()
            }
        }
    })
}

/// The `Reflect` methods shared by every derived kind.
pub(crate) fn common_reflect_tokens(rp: &syn::Path, kind: TokenStream) -> TokenStream {
    quote! {
        fn set(
            &mut self,
            value: ::std::boxed::Box<dyn #rp::Reflect>,
        ) -> ::core::result::Result<(), ::std::boxed::Box<dyn #rp::Reflect>> {
            *self = value.take::<Self>()?;
            ::core::result::Result::Ok(())
        }

        #[inline]
        fn reflect_kind(&self) -> #rp::info::ReflectKind {
            #rp::info::ReflectKind::#kind
        }

        #[inline]
        fn reflect_ref(&self) -> #rp::ops::ReflectRef<'_> {
            #rp::ops::ReflectRef::#kind(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> #rp::ops::ReflectMut<'_> {
            #rp::ops::ReflectMut::#kind(self)
        }

        fn try_apply(&mut self, value: &dyn #rp::Reflect) -> ::core::result::Result<(), #rp::ops::ApplyError> {
            match value.downcast_ref::<Self>() {
                ::core::option::Option::Some(value) => {
                    ::core::clone::Clone::clone_from(self, value);
                    ::core::result::Result::Ok(())
                }
                ::core::option::Option::None => {
                    ::core::result::Result::Err(#rp::ops::ApplyError::mismatched(value, self))
                }
            }
        }

        #[inline]
        fn reflect_clone(&self) -> ::std::boxed::Box<dyn #rp::Reflect> {
            ::std::boxed::Box::new(::core::clone::Clone::clone(self))
        }

        #[inline]
        fn as_serialize(&self) -> &dyn #rp::__macro_exports::erased_serde::Serialize {
            self
        }
    }
}
