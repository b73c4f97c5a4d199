//! # linewise-macros
//!
//! Procedural macros for running linewise as part of `cargo test`.
//! Use them through the `linewise` facade crate:
//!
//! ```rust,ignore
//! // tests/style.rs
//! linewise::check!();
//! linewise::check!(config = "ruby/linewise.toml", fail_on = "warning");
//! ```

#![forbid(unsafe_code)]

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Expr, ExprLit, Lit, LitStr, MetaNameValue, Token};

/// Generates a `#[test]` that checks the project's Ruby sources.
///
/// Accepted arguments, all optional:
///
/// - `config = "path"`: config file, relative to the project root
/// - `fail_on = "error" | "warning"`: overrides the configured threshold
/// - `name = "ident"`: name of the generated test (default `linewise_check`)
#[proc_macro]
pub fn check(input: TokenStream) -> TokenStream {
    expand_check(input.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Debug, Default)]
struct CheckArgs {
    config: Option<LitStr>,
    fail_on: Option<LitStr>,
    name: Option<LitStr>,
}

impl CheckArgs {
    fn parse(input: TokenStream2) -> syn::Result<Self> {
        let pairs = Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse2(input)?;
        let mut args = Self::default();

        for pair in pairs {
            let Some(key) = pair.path.get_ident() else {
                return Err(syn::Error::new_spanned(&pair.path, "expected an argument name"));
            };
            let value = match &pair.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(value),
                    ..
                }) => value.clone(),
                other => return Err(syn::Error::new_spanned(other, "expected a string literal")),
            };

            let slot = match key.to_string().as_str() {
                "config" => &mut args.config,
                "fail_on" => &mut args.fail_on,
                "name" => &mut args.name,
                _ => {
                    return Err(syn::Error::new_spanned(
                        key,
                        "unknown argument; expected `config`, `fail_on` or `name`",
                    ))
                }
            };
            if slot.is_some() {
                return Err(syn::Error::new_spanned(key, "duplicate argument"));
            }
            *slot = Some(value);
        }

        if let Some(fail_on) = &args.fail_on {
            if !matches!(fail_on.value().as_str(), "error" | "warning" | "warn") {
                return Err(syn::Error::new(
                    fail_on.span(),
                    "`fail_on` must be \"error\" or \"warning\"",
                ));
            }
        }

        Ok(args)
    }
}

fn optional(value: Option<&LitStr>) -> TokenStream2 {
    match value {
        Some(lit) => quote! { ::core::option::Option::Some(#lit) },
        None => quote! { ::core::option::Option::None },
    }
}

fn expand_check(input: TokenStream2) -> syn::Result<TokenStream2> {
    let args = CheckArgs::parse(input)?;

    let name = match &args.name {
        Some(lit) => lit.parse::<syn::Ident>()?,
        None => syn::Ident::new("linewise_check", Span::call_site()),
    };
    let config = optional(args.config.as_ref());
    let fail_on = optional(args.fail_on.as_ref());

    Ok(quote! {
        #[test]
        fn #name() {
            ::linewise::__internal::run_check(#config, #fail_on);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(input: TokenStream2) -> String {
        expand_check(input).unwrap().to_string()
    }

    #[test]
    fn test_no_arguments() {
        let out = expand(TokenStream2::new());
        assert!(out.contains("fn linewise_check"));
        assert!(out.contains("run_check"));
        assert!(out.contains("Option :: None"));
        assert!(!out.contains("Some"));
    }

    #[test]
    fn test_all_arguments() {
        let out = expand(quote! { config = "ruby.toml", fail_on = "warning", name = "style" });
        assert!(out.contains("fn style"));
        assert!(out.contains("Some (\"ruby.toml\")"));
        assert!(out.contains("Some (\"warning\")"));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(expand_check(quote! { preset = "x" }).is_err());
        assert!(expand_check(quote! { config = 1 }).is_err());
        assert!(expand_check(quote! { config = "a", config = "b" }).is_err());
        assert!(expand_check(quote! { fail_on = "info" }).is_err());
        assert!(expand_check(quote! { name = "not an ident" }).is_err());
    }
}
