//! Paths into `rp_reflect` used by generated code.

/// Get the access path to the `rp_reflect` crate.
///
/// 1. For crates that depend on `rp_reflect`, `::rp_reflect` is returned.
/// 2. For crates that depend on `replica`, `::replica::reflect` is returned.
/// 3. Otherwise `::rp_reflect` is returned, which may be incorrect.
///
/// Reading the manifest is not cheap, so the path is computed once per
/// derive and passed around.
pub(crate) fn rp_reflect() -> syn::Path {
    rp_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("rp_reflect"))
}
