use std::collections::HashMap;

use log::trace;
use quote::ToTokens;
use syn::ext::IdentExt;
use syn::{Attribute, Fields, File, Ident, ImplItem, Item, ItemImpl, ItemStruct, Type, parse_quote};

use super::attrs::{self, FieldArgs, ObservableArgs};
use super::emit;
use crate::diagnostics::Diagnostic;
use crate::errors::HostError;
use crate::host::HostAst;
use crate::naming;
use crate::plan::SynthesizedMember;
use crate::types::{
    AccessLevel, AccessorStyle, ClassKind, FieldFacts, MemberExists, NamingStyle, NodeKind, PropagatedAnnotations,
    Provenance, TypeRef,
};

const PRIMITIVES: &[&str] = &[
    "bool", "char", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize", "f32",
    "f64",
];

/// Index-based handle into a [`RustFileHost`]. Injection only appends, so handles stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RustNode {
    Item(usize),
    Field(usize, usize),
}

/// A parsed Rust file the engine can query and extend.
///
/// Structs with named fields are classes. Generated methods go into one
/// `#[automatically_derived]` inherent impl per struct, appended to the file;
/// generated fields are `#[doc(hidden)]` and carry the synthetic `__` prefix.
#[derive(Debug, Clone)]
pub struct RustFileHost {
    file: File,
    struct_args: HashMap<usize, ObservableArgs>,
    field_args: HashMap<(usize, usize), FieldArgs>,
    reported: Vec<(RustNode, Diagnostic)>,
}

impl RustFileHost {
    /// Wrap a file, validating every `#[observable]` attribute up front.
    pub fn new(file: File) -> syn::Result<Self> {
        let mut struct_args = HashMap::new();
        let mut field_args = HashMap::new();

        for (index, item) in file.items.iter().enumerate() {
            if let Some(args) = attrs::struct_args(item_attrs(item))? {
                struct_args.insert(index, args);
            }
            if let Item::Struct(item) = item {
                for (field_index, field) in item.fields.iter().enumerate() {
                    if let Some(args) = attrs::field_args(&field.attrs)? {
                        field_args.insert((index, field_index), args);
                    }
                }
            }
        }

        Ok(Self {
            file,
            struct_args,
            field_args,
            reported: Vec::new(),
        })
    }

    pub fn parse(source: &str) -> syn::Result<Self> {
        Self::new(syn::parse_file(source)?)
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn into_file(self) -> File {
        self.file
    }

    pub fn reported(&self) -> &[(RustNode, Diagnostic)] {
        &self.reported
    }

    pub fn struct_args(&self, index: usize) -> Option<&ObservableArgs> {
        self.struct_args.get(&index)
    }

    /// Handle of the struct called `name`.
    pub fn find_struct(&self, name: &str) -> Option<RustNode> {
        self.file
            .items
            .iter()
            .position(|item| matches!(item, Item::Struct(item) if item.ident == name))
            .map(RustNode::Item)
    }

    /// Identifier of the item or field behind `node`, for span-accurate errors.
    pub fn ident(&self, node: &RustNode) -> Option<&Ident> {
        match *node {
            RustNode::Item(index) => item_ident(self.file.items.get(index)?),
            RustNode::Field(index, field) => self.struct_at(index)?.fields.iter().nth(field)?.ident.as_ref(),
        }
    }

    /// Remove the `#[observable]` helper attributes from structs and fields.
    pub fn strip_helper_attrs(&mut self) {
        for item in &mut self.file.items {
            if let Some(attrs) = item_attrs_mut(item) {
                attrs.retain(|attr| !attrs::is_observable(attr));
            }
            if let Item::Struct(item) = item {
                for field in item.fields.iter_mut() {
                    field.attrs.retain(|attr| !attrs::is_observable(attr));
                }
            }
        }
    }

    pub fn render(&self) -> String {
        prettyplease::unparse(&self.file)
    }

    fn struct_at(&self, index: usize) -> Option<&ItemStruct> {
        match self.file.items.get(index)? {
            Item::Struct(item) => Some(item),
            _ => None,
        }
    }

    fn class_index(&self, node: &RustNode) -> Result<usize, HostError> {
        match *node {
            RustNode::Item(index) if self.struct_at(index).is_some() => Ok(index),
            _ => Err(HostError::unknown(node)),
        }
    }

    /// Inherent impls for the struct, with the provenance of their methods.
    fn inherent_impls<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (&'a ItemImpl, Provenance)> + 'a {
        self.file.items.iter().filter_map(move |item| match item {
            Item::Impl(block) if block.trait_.is_none() && type_name(&block.self_ty).as_deref() == Some(name) => {
                let provenance = if block.attrs.iter().any(is_automatically_derived) {
                    Provenance::FrameworkGenerated
                } else {
                    Provenance::UserWritten
                };
                Some((block, provenance))
            }
            _ => None,
        })
    }

    fn generated_impl_mut(&mut self, index: usize) -> Result<&mut ItemImpl, HostError> {
        let item = self.struct_at(index).ok_or_else(|| HostError::unknown(RustNode::Item(index)))?;
        let name = item.ident.to_string();
        let position = self.file.items.iter().position(|item| {
            matches!(item, Item::Impl(block)
                if block.trait_.is_none()
                    && block.attrs.iter().any(is_automatically_derived)
                    && type_name(&block.self_ty).as_deref() == Some(name.as_str()))
        });

        let position = match position {
            Some(position) => position,
            None => {
                let ident = &item.ident;
                let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
                let block: ItemImpl = parse_quote! {
                    #[automatically_derived]
                    impl #impl_generics #ident #ty_generics #where_clause {}
                };
                self.file.items.push(Item::Impl(block));
                self.file.items.len() - 1
            }
        };

        match &mut self.file.items[position] {
            Item::Impl(block) => Ok(block),
            _ => Err(HostError::unknown(RustNode::Item(position))),
        }
    }
}

impl HostAst for RustFileHost {
    type Node = RustNode;

    fn naming_style(&self) -> NamingStyle {
        NamingStyle::Rust
    }

    fn kind(&self, node: &RustNode) -> NodeKind {
        match *node {
            RustNode::Item(index) => match self.file.items.get(index) {
                Some(Item::Struct(item)) if matches!(item.fields, Fields::Named(_)) => NodeKind::Class(ClassKind::Class),
                Some(Item::Trait(_)) => NodeKind::Class(ClassKind::Interface),
                _ => NodeKind::Other,
            },
            RustNode::Field(index, field) => match self.struct_at(index) {
                Some(item) if matches!(item.fields, Fields::Named(_)) && field < item.fields.len() => NodeKind::Field,
                _ => NodeKind::Other,
            },
        }
    }

    fn parent(&self, node: &RustNode) -> Option<RustNode> {
        match *node {
            RustNode::Item(_) => None,
            RustNode::Field(index, _) => Some(RustNode::Item(index)),
        }
    }

    fn children(&self, node: &RustNode) -> Vec<RustNode> {
        let RustNode::Item(index) = *node else {
            return Vec::new();
        };
        match self.struct_at(index) {
            Some(item) => (0..item.fields.len()).map(|field| RustNode::Field(index, field)).collect(),
            None => Vec::new(),
        }
    }

    fn describe(&self, node: &RustNode) -> String {
        match *node {
            RustNode::Item(index) => match self.file.items.get(index).and_then(item_ident) {
                Some(ident) => ident.to_string(),
                None => format!("item #{index}"),
            },
            RustNode::Field(index, _) => {
                let owner = self.describe(&RustNode::Item(index));
                match self.ident(node) {
                    Some(ident) => format!("{owner}.{}", ident.unraw()),
                    None => owner,
                }
            }
        }
    }

    fn field_facts(&self, node: &RustNode) -> Option<FieldFacts> {
        let RustNode::Field(index, field_index) = *node else {
            return None;
        };
        let item = self.struct_at(index)?;
        let field = item.fields.iter().nth(field_index)?;
        let name = field.ident.as_ref()?.unraw().to_string();
        let args = self.field_args.get(&(index, field_index));

        let ty_text = field.ty.to_token_stream().to_string();
        let ty = if type_name(&field.ty).is_some_and(|name| PRIMITIVES.contains(&name.as_str()))
            && matches!(&field.ty, Type::Path(path) if path.path.segments.len() == 1)
        {
            TypeRef::primitive(ty_text)
        } else {
            TypeRef::new(ty_text)
        };

        let mut annotations = Vec::new();
        if is_option(&field.ty) {
            annotations.push("Nullable".to_string());
        }

        let access = match args {
            Some(args) if args.skip => Some(AccessLevel::None),
            Some(FieldArgs { access: Some(level), .. }) => Some(*level),
            _ => self.struct_args.get(&index).and_then(|args| args.access),
        };

        Some(FieldFacts {
            name,
            ty,
            is_static: false,
            is_final: args.is_some_and(|args| args.readonly),
            annotations,
            deprecated: field.attrs.iter().any(|attr| attr.path().is_ident("deprecated")),
            access,
        })
    }

    fn class_name(&self, class: &RustNode) -> String {
        self.describe(class)
    }

    fn accessor_style(&self, class: &RustNode) -> Option<AccessorStyle> {
        let RustNode::Item(index) = *class else {
            return None;
        };
        self.struct_args.get(&index)?.accessor_style()
    }

    fn implemented_contracts(&self, class: &RustNode) -> Vec<String> {
        let RustNode::Item(index) = *class else {
            return Vec::new();
        };
        let Some(item) = self.struct_at(index) else {
            return Vec::new();
        };
        let name = item.ident.to_string();

        let mut contracts: Vec<String> = self
            .file
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Impl(block) if type_name(&block.self_ty).as_deref() == Some(name.as_str()) => {
                    block.trait_.as_ref().map(|(_, path, _)| attrs::path_text(path))
                }
                _ => None,
            })
            .collect();
        if let Some(args) = self.struct_args.get(&index) {
            contracts.extend(args.implements.iter().cloned());
        }
        contracts
    }

    /// Inherent methods share one namespace, so arity never disambiguates.
    fn method_exists(&self, class: &RustNode, name: &str, _arity: usize, case_sensitive: bool) -> MemberExists {
        let Ok(index) = self.class_index(class) else {
            return MemberExists::NotExists;
        };
        let Some(item) = self.struct_at(index) else {
            return MemberExists::NotExists;
        };
        let class_name = item.ident.to_string();

        for (block, provenance) in self.inherent_impls(&class_name) {
            for member in &block.items {
                let ImplItem::Fn(method) = member else {
                    continue;
                };
                let existing = method.sig.ident.unraw().to_string();
                let matches = if case_sensitive {
                    existing == name
                } else {
                    existing.eq_ignore_ascii_case(name)
                };
                if matches {
                    return MemberExists::from_provenance(Some(provenance));
                }
            }
        }
        MemberExists::NotExists
    }

    fn field_exists(&self, class: &RustNode, name: &str) -> MemberExists {
        let Some(item) = self.class_index(class).ok().and_then(|index| self.struct_at(index)) else {
            return MemberExists::NotExists;
        };
        let provenance = item
            .fields
            .iter()
            .find(|field| field.ident.as_ref().is_some_and(|ident| ident.unraw() == name))
            .map(|field| {
                let hidden = field.attrs.iter().any(is_doc_hidden);
                if hidden && naming::is_synthetic(name, NamingStyle::Rust) {
                    Provenance::FrameworkGenerated
                } else {
                    Provenance::UserWritten
                }
            });
        MemberExists::from_provenance(provenance)
    }

    fn inject_method(&mut self, class: &RustNode, member: &SynthesizedMember) -> Result<bool, HostError> {
        let index = self.class_index(class)?;
        let class_name = self.class_name(class);
        let method = emit::method(&class_name, member)?;
        let block = self.generated_impl_mut(index)?;

        let duplicate = block
            .items
            .iter()
            .any(|item| matches!(item, ImplItem::Fn(existing) if existing.sig.ident == method.sig.ident));
        if duplicate {
            trace!("{class_name}: `{}` already generated", method.sig.ident);
            return Ok(false);
        }
        block.items.push(ImplItem::Fn(method));
        Ok(true)
    }

    fn inject_field(&mut self, class: &RustNode, member: &SynthesizedMember) -> Result<bool, HostError> {
        let index = self.class_index(class)?;
        let class_name = self.class_name(class);
        let field = emit::field(&class_name, member)?;

        match self.field_exists(class, member.name()) {
            MemberExists::ExistsByFramework => return Ok(false),
            MemberExists::ExistsByUser => {
                return Err(HostError::Rejected {
                    class: class_name,
                    member: member.name().to_string(),
                    reason: "a user-written field with that name exists".to_string(),
                });
            }
            MemberExists::NotExists => {}
        }

        match &mut self.file.items[index] {
            Item::Struct(ItemStruct {
                fields: Fields::Named(named),
                ..
            }) => {
                named.named.push(field);
                Ok(true)
            }
            _ => Err(HostError::unknown(class)),
        }
    }

    fn report(&mut self, node: &RustNode, diagnostic: &Diagnostic) {
        self.reported.push((*node, diagnostic.clone()));
    }

    fn annotated_targets(&self) -> Vec<(RustNode, PropagatedAnnotations)> {
        let mut field_targets: Vec<_> = self
            .field_args
            .iter()
            .filter(|((index, _), args)| !self.struct_args.contains_key(index) || !args.propagated.is_empty())
            .map(|(&(index, field), args)| (RustNode::Field(index, field), args.propagated.clone()))
            .collect();
        field_targets.sort_by_key(|(node, _)| node_order(node));

        let mut class_targets: Vec<_> = self
            .struct_args
            .iter()
            .map(|(&index, args)| (RustNode::Item(index), args.propagated.clone()))
            .collect();
        class_targets.sort_by_key(|(node, _)| node_order(node));

        field_targets.extend(class_targets);
        field_targets
    }
}

fn node_order(node: &RustNode) -> (usize, usize) {
    match *node {
        RustNode::Item(index) => (index, 0),
        RustNode::Field(index, field) => (index, field),
    }
}

fn item_attrs(item: &Item) -> &[Attribute] {
    match item {
        Item::Struct(item) => &item.attrs,
        Item::Enum(item) => &item.attrs,
        Item::Union(item) => &item.attrs,
        Item::Trait(item) => &item.attrs,
        Item::Fn(item) => &item.attrs,
        Item::Type(item) => &item.attrs,
        _ => &[],
    }
}

fn item_attrs_mut(item: &mut Item) -> Option<&mut Vec<Attribute>> {
    match item {
        Item::Struct(item) => Some(&mut item.attrs),
        Item::Enum(item) => Some(&mut item.attrs),
        Item::Union(item) => Some(&mut item.attrs),
        Item::Trait(item) => Some(&mut item.attrs),
        Item::Fn(item) => Some(&mut item.attrs),
        Item::Type(item) => Some(&mut item.attrs),
        _ => None,
    }
}

fn item_ident(item: &Item) -> Option<&Ident> {
    match item {
        Item::Struct(item) => Some(&item.ident),
        Item::Enum(item) => Some(&item.ident),
        Item::Union(item) => Some(&item.ident),
        Item::Trait(item) => Some(&item.ident),
        Item::Fn(item) => Some(&item.sig.ident),
        Item::Type(item) => Some(&item.ident),
        _ => None,
    }
}

/// Last path segment of a type, ignoring generics.
fn type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) => path.path.segments.last().map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

fn is_option(ty: &Type) -> bool {
    type_name(ty).as_deref() == Some("Option")
}

fn is_automatically_derived(attr: &Attribute) -> bool {
    attr.path().is_ident("automatically_derived")
}

fn is_doc_hidden(attr: &Attribute) -> bool {
    if !attr.path().is_ident("doc") {
        return false;
    }
    let mut hidden = false;
    let _ = attr.parse_nested_meta(|meta| {
        hidden |= meta.path.is_ident("hidden");
        Ok(())
    });
    hidden
}
