//! 接口标识宏实现

use crate::utils::IdentityArgs;
use proc_macro::TokenStream;
use quote::quote;
use syn::{meta, parse_macro_input, ItemTrait};

/// 实现 #[interface] 宏
pub fn interface_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut identity = IdentityArgs::default();
    let parser = meta::parser(|meta| identity.parse_meta(meta));
    parse_macro_input!(args with parser);

    let item_trait = parse_macro_input!(input as ItemTrait);
    let trait_name = &item_trait.ident;

    let uuid = match identity.require_uuid(trait_name.span()) {
        Ok(uuid) => uuid,
        Err(e) => return e.to_compile_error().into(),
    };
    let name = identity.name.unwrap_or_else(|| trait_name.to_string());
    let description = identity.description.unwrap_or_default();
    let (impl_generics, ty_generics, where_clause) = item_trait.generics.split_for_impl();

    let expanded = quote! {
        #item_trait

        impl #impl_generics ::infrastructure_common::InterfaceTraits for dyn #trait_name #ty_generics #where_clause {
            const ID: ::infrastructure_common::InterfaceId =
                ::infrastructure_common::InterfaceId::from_u128(#uuid);
            const NAME: &'static str = #name;
            const DESCRIPTION: &'static str = #description;
        }
    };

    TokenStream::from(expanded)
}
