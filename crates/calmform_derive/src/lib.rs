use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, parse_macro_input};

#[proc_macro_derive(FormRecord, attributes(form))]
pub fn derive_form_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            input.ident,
            "FormRecord derive currently supports only non-generic structs",
        )
        .to_compile_error()
        .into();
    }

    let record_ident = input.ident;

    let named_fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return syn::Error::new(
                    Span::call_site(),
                    "FormRecord derive requires a struct with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new(
                Span::call_site(),
                "FormRecord derive is only supported on structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let calmform = calmform_path();
    let mut inserts = Vec::new();
    let mut initializers = Vec::new();

    for field in named_fields {
        let Some(field_ident) = field.ident else {
            continue;
        };
        let key = match field_key(&field.attrs) {
            Ok(Some(renamed)) => renamed,
            Ok(None) => field_ident.to_string(),
            Err(error) => return error.to_compile_error().into(),
        };
        let field_ty = field.ty;

        inserts.push(quote! {
            values.insert(
                ::std::string::String::from(#key),
                <#field_ty as #calmform::form::FieldValue>::to_external(&self.#field_ident),
            );
        });

        initializers.push(quote! {
            #field_ident: <#field_ty as #calmform::form::FieldValue>::from_external(
                values.get(#key).unwrap_or(&#calmform::value::ExternalValue::Null),
            ),
        });
    }

    quote! {
        impl #calmform::form::FormRecord for #record_ident {
            fn to_values(
                &self,
            ) -> ::std::collections::BTreeMap<::std::string::String, #calmform::value::ExternalValue> {
                let mut values = ::std::collections::BTreeMap::new();
                #(#inserts)*
                values
            }

            fn from_values(
                values: &::std::collections::BTreeMap<::std::string::String, #calmform::value::ExternalValue>,
            ) -> Self {
                Self {
                    #(#initializers)*
                }
            }
        }
    }
    .into()
}

fn field_key(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut renamed = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("form")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                renamed = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported form attribute, expected `rename`"))
            }
        })?;
    }
    Ok(renamed)
}

fn calmform_path() -> TokenStream2 {
    match crate_name("calmform") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::calmform),
    }
}
