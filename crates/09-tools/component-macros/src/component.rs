//! 组件标识派生宏实现

use crate::utils::IdentityArgs;
use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

/// 实现 #[derive(ComponentTraits)] 宏
pub fn derive_component_traits_impl(input: DeriveInput) -> TokenStream {
    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;

    let mut identity = IdentityArgs::default();
    for attr in &input.attrs {
        if attr.path().is_ident("component") {
            attr.parse_nested_meta(|meta| identity.parse_meta(meta))?;
        }
    }

    let uuid = identity.require_uuid(struct_name.span())?;
    let name = identity.name.unwrap_or_else(|| struct_name.to_string());
    let description = identity.description.unwrap_or_default();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::infrastructure_common::ComponentTraits for #struct_name #ty_generics #where_clause {
            const ID: ::infrastructure_common::ComponentId =
                ::infrastructure_common::ComponentId::from_u128(#uuid);
            const NAME: &'static str = #name;
            const DESCRIPTION: &'static str = #description;
        }
    })
}
