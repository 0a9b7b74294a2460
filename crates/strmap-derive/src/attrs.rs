use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Field, LitStr};

use crate::ATTRIBUTE_NAME;

/// Flags from `#[strmap(...)]` on the type itself.
#[derive(Default, Debug)]
pub(crate) struct ContainerAttrs {
    pub text: bool,
    pub display: bool,
    pub map: bool,
    pub default: bool,
}

impl ContainerAttrs {
    pub(crate) fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| {
                let flag = if meta.path.is_ident("text") {
                    &mut parsed.text
                } else if meta.path.is_ident("display") {
                    &mut parsed.display
                } else if meta.path.is_ident("map") {
                    &mut parsed.map
                } else if meta.path.is_ident("default") {
                    &mut parsed.default
                } else {
                    return Err(meta.error(
                        "unknown strmap flag, expected `text`, `display`, `map` or `default`",
                    ));
                };
                *flag = true;
                Ok(())
            })?;
        }
        Ok(parsed)
    }

    pub(crate) fn has_hooks(&self) -> bool {
        self.text || self.display || self.map
    }

    /// `Value` accessor overrides for the declared hooks.
    pub(crate) fn hook_methods(&self) -> TokenStream {
        let text = self.text.then(|| {
            quote! {
                fn as_text_codec(&self) -> ::core::option::Option<&dyn ::strmap::TextCodec> {
                    ::core::option::Option::Some(self)
                }

                fn as_text_codec_mut(&mut self) -> ::core::option::Option<&mut dyn ::strmap::TextCodec> {
                    ::core::option::Option::Some(self)
                }
            }
        });
        let display = self.display.then(|| {
            quote! {
                fn as_display(&self) -> ::core::option::Option<&dyn ::core::fmt::Display> {
                    ::core::option::Option::Some(self)
                }
            }
        });
        let map = self.map.then(|| {
            quote! {
                fn as_map_codec(&self) -> ::core::option::Option<&dyn ::strmap::MapCodec> {
                    ::core::option::Option::Some(self)
                }

                fn as_map_codec_mut(&mut self) -> ::core::option::Option<&mut dyn ::strmap::MapCodec> {
                    ::core::option::Option::Some(self)
                }
            }
        });
        quote! { #text #display #map }
    }
}

/// The annotation string of `#[strmap("...")]` on a field, if present.
pub(crate) fn field_tag(field: &Field) -> syn::Result<Option<LitStr>> {
    let mut tag = None;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident(ATTRIBUTE_NAME)) {
        if tag.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate strmap annotation"));
        }
        tag = Some(attr.parse_args::<LitStr>()?);
    }
    Ok(tag)
}
