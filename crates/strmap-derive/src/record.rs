use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Visibility};

use crate::attrs::{field_tag, ContainerAttrs};
use crate::with_value_bounds;

/// The annotation that excludes a field; mirrors `strmap::directive::IGNORE`.
const IGNORE_TAG: &str = "-";

/// Implement `Record` and `Value` for a struct with named fields.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let fields: Vec<_> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Record requires named fields; use derive(Value) for newtypes",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record can only be derived for structs",
            ))
        }
    };
    let attrs = ContainerAttrs::parse(&input.attrs)?;

    let mut defs = Vec::with_capacity(fields.len());
    let mut getters = Vec::new();
    let mut setters = Vec::new();
    let mut zero_checks = Vec::new();
    let mut zero_fields = Vec::new();
    let mut all_zeroable = true;

    for (index, field) in fields.iter().enumerate() {
        let Some(member) = &field.ident else {
            return Err(syn::Error::new_spanned(field, "field without a name"));
        };
        let name = member.unraw().to_string();
        let lit = field_tag(field)?;
        let ignored = lit.as_ref().is_some_and(|lit| lit.value() == IGNORE_TAG);
        let tag = match lit {
            Some(lit) => quote!(::core::option::Option::Some(#lit)),
            None => quote!(::core::option::Option::None),
        };
        let visible = !matches!(field.vis, Visibility::Inherited);
        defs.push(quote! {
            ::strmap::FieldDef { name: #name, tag: #tag, visible: #visible }
        });

        // Ignored fields are never read or written, so their type need not be a Value.
        if !visible || ignored {
            all_zeroable = false;
            continue;
        }
        let ty = &field.ty;
        getters.push(quote!(#index => ::core::option::Option::Some(&self.#member),));
        setters.push(quote!(#index => ::core::option::Option::Some(&mut self.#member),));
        zero_checks.push(quote!(::strmap::Value::is_zero(&self.#member)));
        zero_fields.push(quote!(#member: <#ty as ::strmap::Value>::zero()?,));
    }

    let zero = if attrs.default {
        quote!(::core::option::Option::Some(<Self as ::core::default::Default>::default()))
    } else if all_zeroable {
        quote!(::core::option::Option::Some(Self { #(#zero_fields)* }))
    } else {
        // Private and ignored fields cannot be zeroed without Default.
        quote!(::core::option::Option::None)
    };
    let hooks = attrs.hook_methods();

    let ident = &input.ident;
    let generics = with_value_bounds(&input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::strmap::Record for #ident #ty_generics #where_clause {
            fn field_defs(&self) -> &'static [::strmap::FieldDef] {
                static FIELDS: &[::strmap::FieldDef] = &[#(#defs),*];
                FIELDS
            }

            fn field(&self, index: usize) -> ::core::option::Option<&dyn ::strmap::Value> {
                match index {
                    #(#getters)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn ::strmap::Value> {
                match index {
                    #(#setters)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics ::strmap::Value for #ident #ty_generics #where_clause {
            fn is_zero(&self) -> bool {
                true #(&& #zero_checks)*
            }

            fn zero() -> ::core::option::Option<Self> {
                #zero
            }

            fn as_record(&self) -> ::core::option::Option<&dyn ::strmap::Record> {
                ::core::option::Option::Some(self)
            }

            fn as_record_mut(&mut self) -> ::core::option::Option<&mut dyn ::strmap::Record> {
                ::core::option::Option::Some(self)
            }

            #hooks
        }
    })
}
