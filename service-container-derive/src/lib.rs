//! Derive macro for service-container
//!
//! `#[derive(Autowire)]` generates the constructor-table entry for a struct:
//! its parameter list, the build function, and the scanner metadata.
//!
//! # Example
//!
//! ```rust,ignore
//! use service_container::{Autowire, Container, Lazy};
//! use std::sync::Arc;
//!
//! struct Config;
//! struct SearchIndex;
//! struct AuditLog;
//!
//! #[derive(Autowire)]
//! #[autowire(injectable, singleton, alias = "mailer")]
//! struct Mailer {
//!     #[inject]
//!     config: Arc<Config>,
//!     #[inject(id = "search")]
//!     index: Lazy<SearchIndex>,
//!     #[inject]
//!     audit: Option<Arc<AuditLog>>,
//!     #[param(default = 25)]
//!     port: u16,
//!     host: String,
//! }
//!
//! let container = Container::new();
//! container.register_type::<Mailer>();
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Expr, Fields, GenericArgument, LitStr, PathArguments, Token,
    Type, parse_macro_input,
};

/// Derive macro implementing `service_container::Autowire`.
///
/// # Struct attributes
///
/// - `#[autowire(injectable)]` - Register the type when a scan finds it
/// - `#[autowire(singleton)]`, `#[autowire(scoped)]`, `#[autowire(transient)]`,
///   or `#[autowire(lifecycle = "singleton")]` - Lifecycle used by the scanner
/// - `#[autowire(alias = "id")]` - Identifier to register under
/// - `#[autowire(sealed)]` - Never wrap the type in a lazy proxy
/// - `#[autowire(name = "app::Type")]` - Type identifier (default: `type_name`)
///
/// # Field attributes
///
/// - `#[inject]` on `Arc<T>` - Required service dependency
/// - `#[inject]` on `Option<Arc<T>>` - Optional service dependency
/// - `#[inject]` on `Lazy<T>` - Dependency kept deferred until first use
/// - `#[inject(id = "...")]` - Resolve an explicit identifier instead of `T`'s
/// - `#[param(default)]` / `#[param(default = expr)]` - Default for a value field
///
/// Fields without `#[inject]` are value parameters: they must be supplied as
/// overrides to `make_with` or have a default, and their type must be `Clone`.
#[proc_macro_derive(Autowire, attributes(autowire, inject, param))]
pub fn derive_autowire(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Autowire can only be derived for structs",
            ));
        }
    };

    let meta = ServiceAttrs::parse(&input.attrs)?;

    let mut params = Vec::new();
    let mut inits = Vec::new();

    match fields {
        Fields::Named(named) => {
            for field in &named.named {
                let Some(ident) = field.ident.as_ref() else {
                    continue;
                };
                let param = ident.to_string();
                let (chain, init) = field_tokens(&param, &field.ty, &field.attrs)?;
                params.push(chain);
                inits.push(quote! { #ident: #init });
            }
        }
        Fields::Unit => {}
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Autowire can only be derived for structs with named fields or unit structs",
            ));
        }
    }

    let start = match &meta.name {
        Some(id) => quote! { ::service_container::Constructor::named(#id) },
        None => quote! { ::service_container::Constructor::of::<Self>() },
    };
    let meta_tokens = meta.meta_tokens();
    let (args, body) = match fields {
        Fields::Unit => (quote! { _ }, quote! { Self }),
        _ => (quote! { args }, quote! { Self { #(#inits),* } }),
    };

    Ok(quote! {
        impl #impl_generics ::service_container::Autowire for #name #ty_generics #where_clause {
            fn constructor() -> ::service_container::Constructor {
                #start
                    .meta(#meta_tokens)
                    #(#params)*
                    .build(|#args: &::service_container::Arguments| {
                        ::std::result::Result::Ok(#body)
                    })
            }
        }
    })
}

/// Struct-level `#[autowire(...)]` settings
#[derive(Default)]
struct ServiceAttrs {
    injectable: bool,
    lifecycle: Option<TokenStream2>,
    alias: Option<LitStr>,
    sealed: bool,
    name: Option<LitStr>,
}

impl ServiceAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("autowire")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("injectable") {
                    out.injectable = true;
                } else if meta.path.is_ident("sealed") {
                    out.sealed = true;
                } else if meta.path.is_ident("singleton") {
                    out.lifecycle = Some(lifecycle_tokens("singleton"));
                } else if meta.path.is_ident("scoped") {
                    out.lifecycle = Some(lifecycle_tokens("scoped"));
                } else if meta.path.is_ident("transient") {
                    out.lifecycle = Some(lifecycle_tokens("transient"));
                } else if meta.path.is_ident("lifecycle") {
                    let lit: LitStr = meta.value()?.parse()?;
                    match lit.value().as_str() {
                        value @ ("singleton" | "scoped" | "transient") => {
                            out.lifecycle = Some(lifecycle_tokens(value));
                        }
                        _ => {
                            return Err(syn::Error::new_spanned(
                                &lit,
                                "lifecycle must be \"singleton\", \"scoped\" or \"transient\"",
                            ));
                        }
                    }
                } else if meta.path.is_ident("alias") {
                    out.alias = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("name") {
                    out.name = Some(meta.value()?.parse()?);
                } else {
                    return Err(meta.error("unsupported autowire attribute"));
                }
                Ok(())
            })?;
        }

        Ok(out)
    }

    fn meta_tokens(&self) -> TokenStream2 {
        let injectable = self.injectable;
        let sealed = self.sealed;
        let lifecycle = match &self.lifecycle {
            Some(lifecycle) => quote! { ::std::option::Option::Some(#lifecycle) },
            None => quote! { ::std::option::Option::None },
        };
        let alias = match &self.alias {
            Some(alias) => quote! { ::std::option::Option::Some(::std::string::String::from(#alias)) },
            None => quote! { ::std::option::Option::None },
        };

        quote! {
            ::service_container::ServiceMeta {
                injectable: #injectable,
                lifecycle: #lifecycle,
                alias: #alias,
                sealed: #sealed,
            }
        }
    }
}

fn lifecycle_tokens(value: &str) -> TokenStream2 {
    match value {
        "singleton" => quote! { ::service_container::Lifecycle::Singleton },
        "scoped" => quote! { ::service_container::Lifecycle::Scoped },
        _ => quote! { ::service_container::Lifecycle::Transient },
    }
}

/// Parsed `#[inject]` attribute: the explicit identifier, if any
struct Inject {
    id: Option<LitStr>,
}

fn find_inject_attr(attrs: &[Attribute]) -> syn::Result<Option<Inject>> {
    let Some(attr) = attrs.iter().find(|a| a.path().is_ident("inject")) else {
        return Ok(None);
    };

    let mut inject = Inject { id: None };
    if attr.meta.require_path_only().is_ok() {
        return Ok(Some(inject));
    }

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("id") {
            inject.id = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported inject attribute"))
        }
    })?;
    Ok(Some(inject))
}

/// `None` for no `#[param(default)]`, `Some(None)` for `Default::default()`
fn find_default_attr(attrs: &[Attribute]) -> syn::Result<Option<Option<Expr>>> {
    let mut default = None;

    for attr in attrs.iter().filter(|a| a.path().is_ident("param")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                if meta.input.peek(Token![=]) {
                    default = Some(Some(meta.value()?.parse::<Expr>()?));
                } else {
                    default = Some(None);
                }
                Ok(())
            } else {
                Err(meta.error("unsupported param attribute"))
            }
        })?;
    }

    Ok(default)
}

/// Constructor chain call and initializer for one field
fn field_tokens(
    param: &str,
    ty: &Type,
    attrs: &[Attribute],
) -> syn::Result<(TokenStream2, TokenStream2)> {
    let Some(inject) = find_inject_attr(attrs)? else {
        let chain = match find_default_attr(attrs)? {
            None => quote! { .value(#param) },
            Some(None) => quote! {
                .value_or_else(#param, || -> #ty { ::std::default::Default::default() })
            },
            Some(Some(expr)) => quote! {
                .value_or_else(#param, || -> #ty { #expr })
            },
        };
        return Ok((chain, quote! { args.value::<#ty>(#param)? }));
    };

    let id_of = |inner: &Type| match &inject.id {
        Some(id) => quote! { #id },
        None => quote! { ::service_container::service_id::<#inner>() },
    };

    if let Some(inner) = generic_inner(ty, "Option").and_then(|t| generic_inner(t, "Arc")) {
        let id = id_of(inner);
        return Ok((
            quote! { .optional_service_id(#param, #id) },
            quote! { args.optional::<#inner>(#param)? },
        ));
    }

    if let Some(inner) = generic_inner(ty, "Lazy") {
        let id = id_of(inner);
        return Ok((
            quote! { .service_id(#param, #id) },
            quote! { args.lazy::<#inner>(#param)? },
        ));
    }

    if let Some(inner) = generic_inner(ty, "Arc") {
        let id = id_of(inner);
        return Ok((
            quote! { .service_id(#param, #id) },
            quote! { args.service::<#inner>(#param)? },
        ));
    }

    Err(syn::Error::new_spanned(
        ty,
        "Fields marked with #[inject] must have type Arc<T>, Option<Arc<T>> or Lazy<T>",
    ))
}

/// Extract `T` from `Wrapper<T>`, matching on the last path segment
fn generic_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first() {
            Some(GenericArgument::Type(inner)) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}
