//! Procedural macros for generating table column descriptors
//!
//! This crate provides the `TableColumns` derive, which turns a row struct
//! into the ordered column list a table page starts from.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod generation;
mod parsing;

use generation::generate_column_source_impl;
use parsing::{parse_columns, parse_container_attributes};

/// Derive macro for the `ColumnSource` trait
///
/// Every named field becomes a column, in declaration order. The key defaults
/// to the field name (or its camelCase form with `rename_all`), the title to
/// the field name in title case.
///
/// ```rust,ignore
/// use tablehaus::prelude::*;
///
/// #[derive(TableColumns)]
/// #[table_columns(rename_all = "camelCase")]
/// pub struct OrderRow {
///     pub id: u64,
///
///     #[column(title = "Customer")]
///     pub customer_name: String,
///
///     #[column(hidden)]
///     pub notes: String,
///
///     #[column(skip)]
///     pub raw: serde_json::Value,
/// }
/// ```
#[proc_macro_derive(TableColumns, attributes(table_columns, column))]
pub fn derive_table_columns(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let rule = match parse_container_attributes(&input.attrs) {
        Ok(rule) => rule,
        Err(e) => return e.to_compile_error().into(),
    };

    let columns = match parse_columns(&input.data, rule) {
        Ok(columns) => columns,
        Err(e) => return e.to_compile_error().into(),
    };

    TokenStream::from(generate_column_source_impl(name, &input.generics, &columns))
}
