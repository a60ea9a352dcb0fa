//! Parsing utilities for `#[table_columns]` and `#[column]` attributes
//!
//! This module turns a row struct into an ordered list of column
//! specifications and rejects keys a table cannot address.

use std::collections::HashSet;
use syn::{Attribute, Data, Error, Fields, LitStr, Result};

/// How field names become column keys when no explicit key is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameRule {
    #[default]
    None,
    CamelCase,
}

impl RenameRule {
    fn parse(value: &str, span: proc_macro2::Span) -> Result<Self> {
        match value {
            "camelCase" => Ok(RenameRule::CamelCase),
            "snake_case" | "none" => Ok(RenameRule::None),
            other => Err(Error::new(
                span,
                format!("unsupported rename_all rule '{}': use \"camelCase\" or \"snake_case\"", other),
            )),
        }
    }

    pub fn apply(&self, field_name: &str) -> String {
        match self {
            RenameRule::None => field_name.to_string(),
            RenameRule::CamelCase => to_camel_case(field_name),
        }
    }
}

/// One generated column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: String,
    pub title: String,
    pub hidden: bool,
}

/// Validate a column key and return syn::Error for better proc macro error handling
pub fn validate_column_key_syn(key: &str, span: proc_macro2::Span) -> Result<()> {
    validate_column_key(key).map_err(|e| Error::new(span, format!("Invalid column key '{}': {}", key, e)))
}

/// Keys are joined into cache keys and request fields, so no whitespace or separators
fn validate_column_key(key: &str) -> std::result::Result<(), String> {
    if key.is_empty() {
        return Err("Key cannot be empty".to_string());
    }
    if key.chars().any(|c| c.is_whitespace() || c == ':') {
        return Err("Key cannot contain whitespace or ':'".to_string());
    }
    Ok(())
}

pub fn parse_container_attributes(attrs: &[Attribute]) -> Result<RenameRule> {
    let mut rule = RenameRule::default();

    for attr in attrs {
        if !attr.path().is_ident("table_columns") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: LitStr = meta.value()?.parse()?;
                rule = RenameRule::parse(&value.value(), value.span())?;
                Ok(())
            } else {
                Err(meta.error("unknown table_columns attribute, expected `rename_all`"))
            }
        })?;
    }

    Ok(rule)
}

pub fn parse_columns(data: &Data, rule: RenameRule) -> Result<Vec<ColumnSpec>> {
    let Data::Struct(data_struct) = data else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "TableColumns can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields_named) = &data_struct.fields else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "TableColumns can only be derived for structs with named fields",
        ));
    };

    let mut columns = Vec::new();
    let mut seen = HashSet::new();

    for field in &fields_named.named {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;
        let field_name_str = field_name.to_string();
        let field_name_str = field_name_str.trim_start_matches("r#");

        let mut key = None;
        let mut title = None;
        let mut hidden = false;
        let mut skip = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("column") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("key") {
                    let value: LitStr = meta.value()?.parse()?;
                    key = Some(value.value());
                } else if meta.path.is_ident("title") {
                    let value: LitStr = meta.value()?.parse()?;
                    title = Some(value.value());
                } else if meta.path.is_ident("hidden") {
                    hidden = true;
                } else if meta.path.is_ident("skip") {
                    skip = true;
                } else {
                    return Err(meta.error(
                        "unknown column attribute, expected `key`, `title`, `hidden` or `skip`",
                    ));
                }
                Ok(())
            })?;
        }

        if skip {
            continue;
        }

        let key = key.unwrap_or_else(|| rule.apply(field_name_str));
        validate_column_key_syn(&key, field_name.span())?;
        if !seen.insert(key.clone()) {
            return Err(Error::new(
                field_name.span(),
                format!("Duplicate column key '{}'", key),
            ));
        }

        columns.push(ColumnSpec {
            title: title.unwrap_or_else(|| to_title(field_name_str)),
            key,
            hidden,
        });
    }

    if columns.is_empty() {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "TableColumns needs at least one column that is not skipped",
        ));
    }

    Ok(columns)
}

/// `customer_name` -> `customerName`
pub fn to_camel_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut upper_next = false;

    for c in name.trim_start_matches('_').chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            result.extend(c.to_uppercase());
            upper_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// `customer_name` -> `Customer Name`
pub fn to_title(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
