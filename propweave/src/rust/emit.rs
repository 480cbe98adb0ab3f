//! Translation of planned members into `syn` items.

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::{Attribute, Field, Ident, ImplItemFn, Meta, Type, Visibility, parse_quote};

use crate::errors::HostError;
use crate::plan::{Expr, Receiver, Stmt, SynthesizedMember};
use crate::types::AccessLevel;

pub fn method(class_name: &str, member: &SynthesizedMember) -> Result<ImplItemFn, HostError> {
    match member {
        SynthesizedMember::Setter(plan) => {
            let vis = visibility(plan.access);
            let name = ident(&plan.name)?;
            let param = ident(&plan.field.name)?;
            let ty = parse_type(&plan.field.declared_type.name)?;
            let mut attrs = Vec::new();
            if plan.deprecated {
                attrs.push(parse_quote!(#[deprecated]));
            }
            attrs.extend(attributes(&plan.method_annotations)?);
            // Nullability is carried by `Option`, not by an attribute.
            let param_annotations: Vec<String> = plan
                .param_annotations
                .iter()
                .filter(|annotation| !plan.field.nullability_annotations.contains(annotation))
                .cloned()
                .collect();
            let param_attrs = attributes(&param_annotations)?;
            let body = statements(class_name, &plan.body)?;
            let output = if plan.returns_self {
                quote!(-> &mut Self)
            } else {
                TokenStream::new()
            };

            impl_fn(
                &plan.name,
                quote! {
                    #(#attrs)*
                    #vis fn #name(&mut self, #(#param_attrs)* #param: #ty) #output {
                        #(#body)*
                    }
                },
            )
        }
        SynthesizedMember::Getter(plan) => {
            let vis = visibility(plan.access);
            let name = ident(&plan.name)?;
            let field = ident(&plan.field.name)?;
            let ty = parse_type(&plan.field.declared_type.name)?;
            reject_static(class_name, &plan.name, plan.is_static)?;

            let tokens = if plan.field.declared_type.primitive {
                quote! {
                    #vis fn #name(&self) -> #ty {
                        self.#field
                    }
                }
            } else {
                quote! {
                    #vis fn #name(&self) -> &#ty {
                        &self.#field
                    }
                }
            };
            impl_fn(&plan.name, tokens)
        }
        SynthesizedMember::DescriptorAccessor(plan) => {
            let name = ident(&plan.name)?;
            let ty = parse_type(&plan.return_type)?;
            let value = expression(&plan.return_expression)?;
            impl_fn(
                &plan.name,
                quote! {
                    pub fn #name(&self) -> &'static #ty {
                        #value
                    }
                },
            )
        }
        SynthesizedMember::FieldListenerRegistry { .. } | SynthesizedMember::BeanListenerRegistry { .. } => {
            Err(rejected(class_name, member.name(), "registries are fields, not methods"))
        }
    }
}

/// Registry fields are `Option`s left at `None` until a listener registers.
pub fn field(class_name: &str, member: &SynthesizedMember) -> Result<Field, HostError> {
    let (name, ty) = match member {
        SynthesizedMember::FieldListenerRegistry {
            field,
            backing_field_name,
            registry_type,
        } => {
            reject_static(class_name, backing_field_name, field.is_static)?;
            let ty = format!(
                "::core::option::Option<{registry_type}<{}>>",
                field.declared_type.name
            );
            (backing_field_name, parse_type(&ty)?)
        }
        SynthesizedMember::BeanListenerRegistry {
            backing_field_name,
            registry_type,
        } => {
            let ty = format!("::core::option::Option<{registry_type}<Self>>");
            (backing_field_name, parse_type(&ty)?)
        }
        _ => return Err(rejected(class_name, member.name(), "only registries are injected as fields")),
    };
    let ident = ident(name)?;
    Field::parse_named
        .parse2(quote! {
            #[doc(hidden)]
            pub #ident: #ty
        })
        .map_err(|err| HostError::invalid_syntax("field", name.clone(), err))
}

fn visibility(access: AccessLevel) -> Visibility {
    match access {
        AccessLevel::Public => parse_quote!(pub),
        AccessLevel::Protected => parse_quote!(pub(super)),
        AccessLevel::Package => parse_quote!(pub(crate)),
        AccessLevel::Private | AccessLevel::None => Visibility::Inherited,
    }
}

/// Names are kept unraw in plans; keywords such as `type` come back as `r#type`.
fn ident(name: &str) -> Result<Ident, HostError> {
    syn::parse_str::<Ident>(name)
        .or_else(|_| syn::parse_str::<Ident>(&format!("r#{name}")))
        .map_err(|err| HostError::invalid_syntax("identifier", name, err))
}

fn impl_fn(name: &str, tokens: TokenStream) -> Result<ImplItemFn, HostError> {
    syn::parse2(tokens).map_err(|err| HostError::invalid_syntax("method", name, err))
}

fn parse_type(text: &str) -> Result<Type, HostError> {
    syn::parse_str(text).map_err(|err| HostError::invalid_syntax("type", text, err))
}

fn attributes(annotations: &[String]) -> Result<Vec<Attribute>, HostError> {
    annotations
        .iter()
        .map(|annotation| {
            let meta: Meta = syn::parse_str(annotation.trim_start_matches('@'))
                .map_err(|err| HostError::invalid_syntax("annotation", annotation.clone(), err))?;
            Ok(parse_quote!(#[#meta]))
        })
        .collect()
}

fn statements(class_name: &str, body: &[Stmt]) -> Result<Vec<TokenStream>, HostError> {
    let mut out = Vec::with_capacity(body.len());
    for stmt in body {
        match stmt {
            // Only `Option` fields accept `None`; there is no null to reject.
            Stmt::NullCheck { .. } => {}
            Stmt::Assign { receiver, field, param } => {
                ensure_instance(class_name, field, receiver)?;
                let field = ident(field)?;
                let param = ident(param)?;
                out.push(quote!(self.#field = #param;));
            }
            Stmt::FireIfPresent {
                receiver,
                registry,
                method,
                args,
            } => {
                ensure_instance(class_name, registry, receiver)?;
                let registry = ident(registry)?;
                let method = ident(method)?;
                let args = args.iter().map(expression).collect::<Result<Vec<_>, _>>()?;
                out.push(quote! {
                    if let ::core::option::Option::Some(listeners) = &self.#registry {
                        listeners.#method(#(#args),*);
                    }
                });
            }
            Stmt::ReturnSelf => out.push(quote!(self)),
            Stmt::Return(value) => {
                let value = expression(value)?;
                out.push(quote!(#value));
            }
        }
    }
    Ok(out)
}

/// Arguments are passed by reference; the setter has already moved the value into the field.
fn expression(expr: &Expr) -> Result<TokenStream, HostError> {
    Ok(match expr {
        Expr::NewValue { field, .. } => {
            let field = ident(field)?;
            quote!(&self.#field)
        }
        Expr::SelfRef => quote!(&*self),
        Expr::FieldRead { field, .. } => {
            let field = ident(field)?;
            quote!(&self.#field)
        }
        Expr::StaticRef { owner, member } => {
            let path: syn::Path = syn::parse_str(&format!("{owner}::{member}"))
                .map_err(|err| HostError::invalid_syntax("path", format!("{owner}::{member}"), err))?;
            quote!(&#path)
        }
    })
}

fn ensure_instance(class_name: &str, member: &str, receiver: &Receiver) -> Result<(), HostError> {
    match receiver {
        Receiver::Instance => Ok(()),
        Receiver::Static { .. } => Err(rejected(class_name, member, "struct fields cannot be static")),
    }
}

fn reject_static(class_name: &str, member: &str, is_static: bool) -> Result<(), HostError> {
    if is_static {
        return Err(rejected(class_name, member, "struct fields cannot be static"));
    }
    Ok(())
}

fn rejected(class_name: &str, member: &str, reason: &str) -> HostError {
    HostError::Rejected {
        class: class_name.to_string(),
        member: member.to_string(),
        reason: reason.to_string(),
    }
}
