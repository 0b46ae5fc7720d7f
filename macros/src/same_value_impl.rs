use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{parse2, parse_quote, Data, DataEnum, DeriveInput, Fields, Index, Result};

pub fn derive_same_value(input: TokenStream) -> Result<TokenStream> {
    let mut input: DeriveInput = parse2(input)?;
    let body = match &input.data {
        Data::Struct(data) => struct_body(&data.fields),
        Data::Enum(data) => enum_body(data),
        Data::Union(_) => bail!(
            input.ident.span(),
            "`SameValue` cannot be derived for unions"
        ),
    };
    let type_params: Vec<_> = input
        .generics
        .type_params()
        .map(|p| p.ident.clone())
        .collect();
    let wc = input.generics.make_where_clause();
    for p in type_params {
        wc.predicates.push(parse_quote!(#p: ::sigtrack::SameValue));
    }
    let ident = &input.ident;
    let (impl_g, type_g, where_c) = input.generics.split_for_impl();
    Ok(quote! {
        #[automatically_derived]
        impl #impl_g ::sigtrack::SameValue for #ident #type_g #where_c {
            #[allow(unreachable_patterns, unused_variables)]
            fn same_value(&self, other: &Self) -> bool {
                #body
            }
        }
    })
}

fn struct_body(fields: &Fields) -> TokenStream {
    let checks = fields.iter().enumerate().map(|(index, field)| {
        let member = match &field.ident {
            Some(ident) => quote!(#ident),
            None => {
                let index = Index::from(index);
                quote!(#index)
            }
        };
        quote!(::sigtrack::SameValue::same_value(&self.#member, &other.#member))
    });
    quote!(true #(&& #checks)*)
}

fn enum_body(data: &DataEnum) -> TokenStream {
    if data.variants.is_empty() {
        return quote!(match *self {});
    }
    let arms = data.variants.iter().map(|variant| {
        let ident = &variant.ident;
        let this: Vec<_> = (0..variant.fields.len())
            .map(|i| format_ident!("__self_{}", i))
            .collect();
        let that: Vec<_> = (0..variant.fields.len())
            .map(|i| format_ident!("__other_{}", i))
            .collect();
        let (this_pat, that_pat) = match &variant.fields {
            Fields::Named(fields) => {
                let names: Vec<_> = fields.named.iter().map(|f| &f.ident).collect();
                (
                    quote!(Self::#ident { #(#names: #this),* }),
                    quote!(Self::#ident { #(#names: #that),* }),
                )
            }
            Fields::Unnamed(_) => (
                quote!(Self::#ident(#(#this),*)),
                quote!(Self::#ident(#(#that),*)),
            ),
            Fields::Unit => (quote!(Self::#ident), quote!(Self::#ident)),
        };
        quote! {
            (#this_pat, #that_pat) => true #(&& ::sigtrack::SameValue::same_value(#this, #that))*
        }
    });
    quote! {
        match (self, other) {
            #(#arms,)*
            _ => false,
        }
    }
}
