//! `#[observable]`: generates accessors, listener registries and change
//! notification for the fields of a struct.
//!
//! ```ignore
//! #[observable(chain, runtime = "crate::rt")]
//! #[derive(Default)]
//! pub struct Person {
//!     name: String,
//!     #[observable(readonly)]
//!     id: u64,
//! }
//! ```
//!
//! The generated setters fire `Person_::NAME` through the bean registry, so the
//! companion type `Person_` must be in scope.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{ToTokens, quote};
use syn::{File, Item, parse_macro_input};

use propweave::rust::{RustFileHost, RustNode};
use propweave::{RuntimeTypes, SynthesisConfig, Synthesizer};

#[proc_macro_attribute]
pub fn observable(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = TokenStream2::from(args);
    let item = parse_macro_input!(input as Item);

    match expand(args, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(args: TokenStream2, item: Item) -> syn::Result<TokenStream2> {
    // The invocation attribute has already been consumed; put it back so the
    // host sees the same options a source file would carry.
    let file: File = if args.is_empty() {
        syn::parse2(quote! { #[observable] #item })?
    } else {
        syn::parse2(quote! { #[observable(#args)] #item })?
    };
    let mut host = RustFileHost::new(file)?;
    let config = config_for(&host);

    Synthesizer::new(config)
        .apply_all(&mut host)
        .map_err(|err| syn::Error::new(Span::call_site(), err.to_string()))?;

    // Warnings have no stable channel on stable Rust; errors become compile errors.
    let mut errors: Option<syn::Error> = None;
    for (node, diagnostic) in host.reported() {
        if !diagnostic.is_error() {
            continue;
        }
        let error = syn::Error::new(span_of(&host, node), &diagnostic.message);
        match errors.as_mut() {
            Some(errors) => errors.combine(error),
            None => errors = Some(error),
        }
    }

    host.strip_helper_attrs();
    let expanded = host.into_file().into_token_stream();
    let errors = errors.map(|err| err.to_compile_error());
    Ok(quote! {
        #expanded
        #errors
    })
}

fn config_for(host: &RustFileHost) -> SynthesisConfig {
    let mut config = SynthesisConfig::default();
    if let Some(args) = host.struct_args(0) {
        if let Some(root) = &args.runtime {
            config.runtime.rust = RuntimeTypes::rust_rooted_at(root);
        }
        if let Some(severity) = args.setter_conflict {
            config.conflicts.setter = severity;
        }
    }
    config
}

fn span_of(host: &RustFileHost, node: &RustNode) -> Span {
    host.ident(node).map(|ident| ident.span()).unwrap_or_else(Span::call_site)
}
