//! `#[base_entity]` injects the columns every table in the server shares:
//! a UUID primary key, `created_at` and, unless disabled, `updated_at`.
//! It also implements the DAO traits that let `DaoBase` stamp those columns.
//!
//! ```ignore
//! #[base_entity]                       // id + created_at + updated_at
//! #[base_entity(updated_at = false)]   // id + created_at (append-only tables)
//! ```

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use std::collections::HashSet;
use syn::{
    Expr, ExprLit, Fields, Ident, ItemStruct, Lit, Meta, Path, Token, parse_macro_input, parse_str,
    punctuated::Punctuated,
};

struct BaseEntityConfig {
    traits_path: Path,
    id_field: Ident,
    created_at_field: Ident,
    updated_at_field: Option<Ident>,
}

impl BaseEntityConfig {
    fn new() -> syn::Result<Self> {
        Ok(Self {
            traits_path: parse_str("crate::db::dao::base_traits")?,
            id_field: Ident::new("id", Span::call_site()),
            created_at_field: Ident::new("created_at", Span::call_site()),
            updated_at_field: Some(Ident::new("updated_at", Span::call_site())),
        })
    }
}

#[proc_macro_attribute]
pub fn base_entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with Punctuated<Meta, Token![,]>::parse_terminated);
    let mut input = parse_macro_input!(item as ItemStruct);

    match expand(args, &mut input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(
    args: Punctuated<Meta, Token![,]>,
    input: &mut ItemStruct,
) -> syn::Result<proc_macro2::TokenStream> {
    let mut config = BaseEntityConfig::new()?;
    apply_args(&mut config, args)?;

    let Fields::Named(fields) = &mut input.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "base_entity requires a struct with named fields",
        ));
    };

    let existing: HashSet<String> = fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref().map(|ident| ident.to_string()))
        .collect();

    let mut injected: Punctuated<syn::Field, Token![,]> = Punctuated::new();

    let id_ident = &config.id_field;
    if !existing.contains(&id_ident.to_string()) {
        injected.push(syn::parse_quote! {
            #[sea_orm(primary_key, auto_increment = false)]
            pub #id_ident: uuid::Uuid
        });
    }

    let created_ident = &config.created_at_field;
    if !existing.contains(&created_ident.to_string()) {
        injected.push(syn::parse_quote! {
            #[sea_orm(default_expr = "Expr::current_timestamp()")]
            pub #created_ident: sea_orm::entity::prelude::DateTimeWithTimeZone
        });
    }

    if let Some(updated_ident) = &config.updated_at_field {
        if !existing.contains(&updated_ident.to_string()) {
            injected.push(syn::parse_quote! {
                #[sea_orm(default_expr = "Expr::current_timestamp()")]
                pub #updated_ident: sea_orm::entity::prelude::DateTimeWithTimeZone
            });
        }
    }

    // Injected columns lead so table layouts read id, created_at, updated_at, ...
    injected.extend(fields.named.iter().cloned());
    fields.named = injected;

    let traits_path = &config.traits_path;
    let set_updated_at = match &config.updated_at_field {
        Some(updated_ident) => quote! {
            self.#updated_ident = sea_orm::ActiveValue::Set(ts);
        },
        None => quote! {
            let _ = ts;
        },
    };
    let tracks_updates = config.updated_at_field.is_some();

    Ok(quote! {
        #input

        impl #traits_path::HasIdActiveModel for ActiveModel {
            fn set_id(&mut self, id: uuid::Uuid) {
                self.#id_ident = sea_orm::ActiveValue::Set(id);
            }
        }

        impl #traits_path::TimestampedActiveModel for ActiveModel {
            const TRACKS_UPDATES: bool = #tracks_updates;

            fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.#created_ident = sea_orm::ActiveValue::Set(ts);
            }

            fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                #set_updated_at
            }
        }

        impl #traits_path::HasCreatedAtColumn for Entity {
            fn created_at_column() -> Column {
                Column::CreatedAt
            }
        }
    })
}

fn apply_args(config: &mut BaseEntityConfig, args: Punctuated<Meta, Token![,]>) -> syn::Result<()> {
    for meta in args {
        let Meta::NameValue(name_value) = meta else {
            return Err(syn::Error::new_spanned(
                meta,
                "expected name-value pair, e.g. updated_at = false",
            ));
        };

        let Some(key) = name_value.path.get_ident().map(|ident| ident.to_string()) else {
            return Err(syn::Error::new_spanned(
                name_value.path,
                "expected simple identifier for attribute key",
            ));
        };

        match (key.as_str(), &name_value.value) {
            ("updated_at", Expr::Lit(ExprLit { lit: Lit::Bool(flag), .. })) => {
                if !flag.value {
                    config.updated_at_field = None;
                }
            }
            ("updated_at", Expr::Lit(ExprLit { lit: Lit::Str(name), .. })) => {
                config.updated_at_field = Some(Ident::new(&name.value(), name.span()));
            }
            ("created_at", Expr::Lit(ExprLit { lit: Lit::Str(name), .. })) => {
                config.created_at_field = Ident::new(&name.value(), name.span());
            }
            ("id", Expr::Lit(ExprLit { lit: Lit::Str(name), .. })) => {
                config.id_field = Ident::new(&name.value(), name.span());
            }
            ("traits", Expr::Lit(ExprLit { lit: Lit::Str(path), .. })) => {
                config.traits_path = path.parse::<Path>().map_err(|err| {
                    syn::Error::new(path.span(), format!("invalid traits path: {err}"))
                })?;
            }
            (_, value) => {
                return Err(syn::Error::new_spanned(
                    value,
                    format!("unsupported base_entity argument `{key}`"),
                ));
            }
        }
    }

    Ok(())
}
