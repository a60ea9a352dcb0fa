//! Code generation for column descriptors

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Generics, Ident};

use crate::parsing::ColumnSpec;

pub fn generate_column_source_impl(
    name: &Ident,
    generics: &Generics,
    columns: &[ColumnSpec],
) -> TokenStream {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let descriptors = columns.iter().enumerate().map(|(index, column)| {
        let key = &column.key;
        let title = &column.title;
        let order = index as u32;
        let visible = !column.hidden;

        quote! {
            ::tablehaus::table_query::ColumnDescriptor {
                key: #key.to_string(),
                title: #title.to_string(),
                visible: #visible,
                order: #order,
            }
        }
    });

    let keys = columns.iter().map(|column| &column.key);

    quote! {
        impl #impl_generics ::tablehaus::table_query::ColumnSource for #name #ty_generics #where_clause {
            fn column_descriptors() -> ::std::vec::Vec<::tablehaus::table_query::ColumnDescriptor> {
                ::std::vec![#(#descriptors),*]
            }
        }

        impl #impl_generics #name #ty_generics #where_clause {
            /// Column keys in declaration order
            pub const COLUMN_KEYS: &'static [&'static str] = &[#(#keys),*];
        }
    }
}
