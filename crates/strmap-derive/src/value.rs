use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::attrs::ContainerAttrs;
use crate::with_value_bounds;

/// Implement `Value` for a leaf type that converts through its declared hooks.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let attrs = ContainerAttrs::parse(&input.attrs)?;
    if !attrs.has_hooks() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "derive(Value) needs at least one of #[strmap(text)], #[strmap(display)] or #[strmap(map)]",
        ));
    }

    let (is_zero, zero) = if attrs.default {
        (
            quote!(*self == <Self as ::core::default::Default>::default()),
            quote!(::core::option::Option::Some(<Self as ::core::default::Default>::default())),
        )
    } else {
        (quote!(false), quote!(::core::option::Option::None))
    };
    let hooks = attrs.hook_methods();

    let ident = &input.ident;
    let generics = with_value_bounds(&input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::strmap::Value for #ident #ty_generics #where_clause {
            fn is_zero(&self) -> bool {
                #is_zero
            }

            fn zero() -> ::core::option::Option<Self> {
                #zero
            }

            #hooks
        }
    })
}
