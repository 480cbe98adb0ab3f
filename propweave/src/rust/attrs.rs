//! Parsing of `#[observable(...)]` attributes on structs and fields.

use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::{Attribute, LitStr, Meta, Path, Token};

use crate::diagnostics::Severity;
use crate::types::{AccessLevel, AccessorStyle, PropagatedAnnotations};

pub const ATTRIBUTE: &str = "observable";

/// Options on a struct-level `#[observable(...)]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservableArgs {
    pub chain: bool,
    pub fluent: bool,
    pub prefixes: Vec<String>,
    pub implements: Vec<String>,
    pub access: Option<AccessLevel>,
    pub propagated: PropagatedAnnotations,
    /// Module path of the listener runtime, e.g. `crate::rt`.
    pub runtime: Option<String>,
    pub setter_conflict: Option<Severity>,
}

impl ObservableArgs {
    /// The struct's own accessor conventions, when it declares any.
    pub fn accessor_style(&self) -> Option<AccessorStyle> {
        if !self.chain && !self.fluent && self.prefixes.is_empty() {
            return None;
        }
        Some(AccessorStyle {
            chain: self.chain,
            fluent: self.fluent,
            prefixes: self.prefixes.clone(),
        })
    }
}

/// Options on a field-level `#[observable(...)]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldArgs {
    pub readonly: bool,
    pub skip: bool,
    pub access: Option<AccessLevel>,
    pub propagated: PropagatedAnnotations,
}

pub fn is_observable(attr: &Attribute) -> bool {
    attr.path().is_ident(ATTRIBUTE)
}

/// Merge every `#[observable]` attribute in `attrs`; `None` when there is none.
pub fn struct_args(attrs: &[Attribute]) -> syn::Result<Option<ObservableArgs>> {
    let mut found = None;
    for attr in attrs.iter().filter(|attr| is_observable(attr)) {
        let args = found.get_or_insert_with(ObservableArgs::default);
        if matches!(attr.meta, Meta::Path(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("chain") {
                args.chain = true;
            } else if meta.path.is_ident("fluent") {
                args.fluent = true;
            } else if meta.path.is_ident("prefix") {
                let value: LitStr = meta.value()?.parse()?;
                args.prefixes.push(value.value());
            } else if meta.path.is_ident("implements") {
                let content;
                syn::parenthesized!(content in meta.input);
                let paths = Punctuated::<Path, Token![,]>::parse_terminated(&content)?;
                args.implements.extend(paths.iter().map(path_text));
            } else if meta.path.is_ident("access") {
                args.access = Some(parse_access(&meta)?);
            } else if meta.path.is_ident("runtime") {
                let value: LitStr = meta.value()?.parse()?;
                let path: Path = value.parse()?;
                args.runtime = Some(path.to_token_stream().to_string().replace(' ', ""));
            } else if meta.path.is_ident("setter_conflict") {
                let value: LitStr = meta.value()?.parse()?;
                args.setter_conflict = Some(match value.value().as_str() {
                    "error" => Severity::Error,
                    "warning" => Severity::Warning,
                    _ => return Err(meta.error("setter_conflict must be \"error\" or \"warning\"")),
                });
            } else if meta.path.is_ident("on_method") {
                args.propagated.on_method.extend(parse_annotations(&meta)?);
            } else if meta.path.is_ident("on_param") {
                args.propagated.on_param.extend(parse_annotations(&meta)?);
            } else {
                return Err(meta.error("unknown observable option"));
            }
            Ok(())
        })?;
    }
    Ok(found)
}

pub fn field_args(attrs: &[Attribute]) -> syn::Result<Option<FieldArgs>> {
    let mut found = None;
    for attr in attrs.iter().filter(|attr| is_observable(attr)) {
        let args = found.get_or_insert_with(FieldArgs::default);
        if matches!(attr.meta, Meta::Path(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("readonly") {
                args.readonly = true;
            } else if meta.path.is_ident("skip") {
                args.skip = true;
            } else if meta.path.is_ident("access") {
                args.access = Some(parse_access(&meta)?);
            } else if meta.path.is_ident("on_method") {
                args.propagated.on_method.extend(parse_annotations(&meta)?);
            } else if meta.path.is_ident("on_param") {
                args.propagated.on_param.extend(parse_annotations(&meta)?);
            } else {
                return Err(meta.error("unknown observable field option"));
            }
            Ok(())
        })?;
    }
    Ok(found)
}

fn parse_access(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<AccessLevel> {
    let value: LitStr = meta.value()?.parse()?;
    AccessLevel::parse(&value.value())
        .ok_or_else(|| meta.error("access must be one of public, protected, package, private, none"))
}

/// `on_method(must_use, inline(always))` → `["must_use", "inline(always)"]`.
fn parse_annotations(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<Vec<String>> {
    let content;
    syn::parenthesized!(content in meta.input);
    let metas = Punctuated::<Meta, Token![,]>::parse_terminated(&content)?;
    Ok(metas.iter().map(|meta| meta.to_token_stream().to_string()).collect())
}

pub fn path_text(path: &Path) -> String {
    path.segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}
