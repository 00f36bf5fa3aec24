use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Field, Fields, LitStr, Type};

pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let kind = extract_kind(input)?;
    let id_field = extract_id_field(input)?;

    let ident = id_field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new(Span::call_site(), "identifier field must be named"))?;
    let ty = &id_field.ty;
    let stored_name = match serde_name(&id_field.attrs, "rename")? {
        Some(name) => name,
        None => {
            let field_name = ident.unraw().to_string();
            match serde_name(&input.attrs, "rename_all")? {
                Some(rule) => apply_rename_rule(&rule, &field_name).ok_or_else(|| {
                    syn::Error::new_spanned(
                        &input.ident,
                        format!("Entity derive: unknown serde rename_all rule {:?}", rule),
                    )
                })?,
                None => field_name,
            }
        }
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::repository_base::Entity for #name #ty_generics #where_clause {
            type Id = #ty;
            const KIND: &'static str = #kind;
            const ID_FIELD: &'static str = #stored_name;

            fn identifier(&self) -> Self::Id {
                ::core::clone::Clone::clone(&self.#ident)
            }

            fn set_identifier(&mut self, id: Self::Id) {
                self.#ident = id;
            }
        }
    })
}

fn extract_kind(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("repository") {
            continue;
        }

        let mut kind = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("kind") {
                let value: LitStr = meta.value()?.parse()?;
                kind = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `kind = \"...\"`"))
            }
        })?;

        if let Some(k) = kind {
            return Ok(k);
        }
    }

    Ok(input.ident.to_string())
}

fn extract_id_field(input: &DeriveInput) -> syn::Result<&Field> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Entity derive: invalid entity shape, expected a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Entity derive: invalid entity shape, expected a struct with named fields",
            ))
        }
    };

    // Last marked field wins, as long as its type can hold an identifier.
    let mut skipped = None;
    for field in fields.iter().rev() {
        if !is_marked_id(field)? {
            continue;
        }
        if is_supported_id_type(&field.ty) {
            return Ok(field);
        }
        skipped.get_or_insert(field);
    }

    match skipped {
        Some(field) => Err(syn::Error::new_spanned(
            &field.ty,
            "Entity derive: identifier field not found; the field marked #[repository(id)] must be `i64` or `String`",
        )),
        None => Err(syn::Error::new_spanned(
            &input.ident,
            "Entity derive: identifier field not found; mark one field with #[repository(id)]",
        )),
    }
}

fn is_marked_id(field: &Field) -> syn::Result<bool> {
    let mut is_id = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("repository") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                is_id = true;
                Ok(())
            } else {
                Err(meta.error("expected `id`"))
            }
        })?;
    }
    Ok(is_id)
}

fn is_supported_id_type(ty: &Type) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .map(|seg| seg.arguments.is_empty() && (seg.ident == "i64" || seg.ident == "String"))
            .unwrap_or(false),
        _ => false,
    }
}

// Value of `#[serde(<option> = "..")]` or `#[serde(<option>(serialize = ".."))]`.
fn serde_name(attrs: &[syn::Attribute], option: &str) -> syn::Result<Option<String>> {
    let mut found = None;
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        // Other serde options are none of our business; skip their values.
        attr.parse_nested_meta(|meta| {
            let wanted = meta.path.is_ident(option);
            if meta.input.peek(syn::Token![=]) {
                let value: syn::Expr = meta.value()?.parse()?;
                if wanted {
                    found = lit_str(&value);
                }
            } else if meta.input.peek(syn::token::Paren) {
                meta.parse_nested_meta(|nested| {
                    if nested.input.peek(syn::Token![=]) {
                        let value: syn::Expr = nested.value()?.parse()?;
                        if wanted && nested.path.is_ident("serialize") {
                            found = lit_str(&value);
                        }
                    }
                    Ok(())
                })?;
            }
            Ok(())
        })?;
    }
    Ok(found)
}

// Field renaming as serde's `rename_all` does it for snake_case field names.
fn apply_rename_rule(rule: &str, field: &str) -> Option<String> {
    let pascal = || {
        let mut out = String::new();
        let mut upper = true;
        for ch in field.chars() {
            if ch == '_' {
                upper = true;
            } else if upper {
                out.push(ch.to_ascii_uppercase());
                upper = false;
            } else {
                out.push(ch);
            }
        }
        out
    };

    let renamed = match rule {
        "lowercase" | "snake_case" => field.to_string(),
        "UPPERCASE" | "SCREAMING_SNAKE_CASE" => field.to_ascii_uppercase(),
        "PascalCase" => pascal(),
        "camelCase" => {
            let pascal = pascal();
            let mut chars = pascal.chars();
            match chars.next() {
                Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                None => pascal,
            }
        }
        "kebab-case" => field.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => field.to_ascii_uppercase().replace('_', "-"),
        _ => return None,
    };
    Some(renamed)
}

fn lit_str(expr: &syn::Expr) -> Option<String> {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(value),
            ..
        }) => Some(value.value()),
        _ => None,
    }
}
