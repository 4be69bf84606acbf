use syn::{Attribute, LitStr, Token, parenthesized, punctuated::Punctuated};

use crate::REFLECT_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// TypeAttributes

/// Type level `#[reflect(...)]` options.
#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    pub default: bool,
    pub exclude_fields: Vec<LitStr>,
    pub exclude_on_construct: Vec<LitStr>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("default") {
                    this.default = true;
                    Ok(())
                } else if meta.path.is_ident("exclude_fields") {
                    this.exclude_fields.extend(parse_names(&meta)?);
                    Ok(())
                } else if meta.path.is_ident("exclude_on_construct") {
                    this.exclude_on_construct.extend(parse_names(&meta)?);
                    Ok(())
                } else {
                    Err(meta.error("unknown type attribute"))
                }
            })?;
        }
        Ok(this)
    }
}

/// Parses `("a", "b", ...)`.
fn parse_names(meta: &syn::meta::ParseNestedMeta) -> syn::Result<Vec<LitStr>> {
    let content;
    parenthesized!(content in meta.input);
    let names = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
    Ok(names.into_iter().collect())
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Field level `#[reflect(...)]` options.
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    pub copy_name: Option<LitStr>,
    pub skip_copy: bool,
    pub constant: bool,
    pub base: bool,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("copy_name") {
                    this.copy_name = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("skip_copy") {
                    this.skip_copy = true;
                    Ok(())
                } else if meta.path.is_ident("constant") {
                    this.constant = true;
                    Ok(())
                } else if meta.path.is_ident("base") {
                    this.base = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown field attribute"))
                }
            })?;
        }
        Ok(this)
    }
}
