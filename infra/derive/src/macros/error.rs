use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, Ident, Type, Variant};

const STATUS_ATTR: &str = "status";
const FROM_SOURCE: &str = "from_source";
const INTERNAL_VARIANT: &str = "Internal";

/// Accepted spellings of the context field type, whitespace stripped.
const CONTEXT_TYPES: [&str; 3] = [
    "Option<Cow<'static,str>>",
    "Option<std::borrow::Cow<'static,str>>",
    "Option<::std::borrow::Cow<'static,str>>",
];

enum StatusMapping {
    Fixed(Ident),
    FromSource,
}

struct ErrorVariant {
    ident: Ident,
    source: Option<(Ident, Type)>,
    has_context: bool,
    status: Option<StatusMapping>,
    cfg_attrs: Vec<Attribute>,
}

pub fn expand_derive(mut input: DeriveInput) -> TokenStream {
    let name = input.ident.clone();
    let ext_trait = format_ident!("{}Ext", name);

    let Data::Enum(data) = &mut input.data else {
        return syn::Error::new_spanned(&name, "kiosk_error can only be applied to enums")
            .to_compile_error();
    };

    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &mut data.variants {
        match inspect_variant(variant) {
            Ok(v) => variants.push(v),
            Err(err) => return err.to_compile_error(),
        }
    }

    let derives = missing_derives(&input);
    let context_trait = context_trait(&name, &ext_trait, &variants);
    let source_impls = variants.iter().filter_map(|v| source_impls(&name, &ext_trait, v));
    let internal_impls = internal_impls(&name, &variants);
    let status_impl = status_impl(&name, &variants);

    quote! {
        #derives
        #input

        #context_trait
        #(#source_impls)*
        #internal_impls
        #status_impl

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    }
}

/// Collects the metadata of one variant and strips the `#[status]` marker from it,
/// since no derive downstream understands that attribute.
fn inspect_variant(variant: &mut Variant) -> syn::Result<ErrorVariant> {
    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(
            &variant.ident,
            "kiosk_error requires named fields for source/context handling",
        ));
    };

    let context = fields.named.iter().find(|f| f.ident.as_ref().is_some_and(|i| i == "context"));
    if let Some(field) = context {
        check_context_type(field)?;
    }

    let source = fields.named.iter().find(|f| is_source_field(f)).and_then(|f| {
        let ident = f.ident.clone()?;
        Some((ident, f.ty.clone()))
    });

    if source.is_some() && context.is_none() {
        return Err(syn::Error::new_spanned(
            &variant.ident,
            "kiosk_error requires `context: Option<Cow<'static, str>>` for variants with a source",
        ));
    }

    let status = parse_status(variant, source.is_some())?;
    variant.attrs.retain(|attr| !attr.path().is_ident(STATUS_ATTR));

    Ok(ErrorVariant {
        ident: variant.ident.clone(),
        source,
        has_context: context.is_some(),
        status,
        cfg_attrs: variant.attrs.iter().filter(|a| a.path().is_ident("cfg")).cloned().collect(),
    })
}

fn parse_status(variant: &Variant, has_source: bool) -> syn::Result<Option<StatusMapping>> {
    let mut found = None;
    for attr in variant.attrs.iter().filter(|a| a.path().is_ident(STATUS_ATTR)) {
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate #[status] attribute"));
        }
        let kind: Ident = attr.parse_args()?;
        if kind == FROM_SOURCE {
            if !has_source {
                return Err(syn::Error::new_spanned(
                    attr,
                    "#[status(from_source)] requires a source field",
                ));
            }
            found = Some(StatusMapping::FromSource);
        } else {
            found = Some(StatusMapping::Fixed(kind));
        }
    }
    Ok(found)
}

fn check_context_type(field: &Field) -> syn::Result<()> {
    let ty = &field.ty;
    let normalized: String = quote!(#ty).to_string().chars().filter(|c| !c.is_whitespace()).collect();
    if CONTEXT_TYPES.contains(&normalized.as_str()) {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(ty, "context field must be Option<Cow<'static, str>>"))
    }
}

fn is_source_field(field: &Field) -> bool {
    field.ident.as_ref().is_some_and(|ident| ident == "source")
        || field.attrs.iter().any(|a| a.path().is_ident("source") || a.path().is_ident("from"))
}

fn missing_derives(input: &DeriveInput) -> TokenStream {
    let mut present = FxHashSet::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                present.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }

    let mut derives = Vec::new();
    if !present.contains("Debug") {
        derives.push(quote! { Debug });
    }
    if !present.contains("Error") {
        derives.push(quote! { ::thiserror::Error });
    }

    if derives.is_empty() { quote! {} } else { quote! { #[derive(#(#derives),*)] } }
}

fn context_trait(name: &Ident, ext_trait: &Ident, variants: &[ErrorVariant]) -> TokenStream {
    let arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let cfg_attrs = &v.cfg_attrs;
        let ident = &v.ident;
        quote! { #(#cfg_attrs)* #name::#ident { context: c, .. } => *c = Some(context.into()), }
    });

    quote! {
        pub trait #ext_trait<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext_trait<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut e| {
                    match &mut e {
                        #( #arms )*
                        _ => {}
                    }
                    e
                })
            }
        }
    }
}

fn source_impls(name: &Ident, ext_trait: &Ident, v: &ErrorVariant) -> Option<TokenStream> {
    if v.ident == INTERNAL_VARIANT {
        return None;
    }
    let (field, ty) = v.source.as_ref()?;
    let ident = &v.ident;
    let cfg_attrs = &v.cfg_attrs;

    Some(quote! {
        #(#cfg_attrs)*
        #[automatically_derived]
        impl From<#ty> for #name {
            #[inline]
            fn from(#field: #ty) -> Self { Self::#ident { #field, context: None } }
        }

        #(#cfg_attrs)*
        impl<T> #ext_trait<T> for std::result::Result<T, #ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|#field| #name::#ident { #field, context: Some(context.into()) })
            }
        }
    })
}

fn internal_impls(name: &Ident, variants: &[ErrorVariant]) -> TokenStream {
    let Some(internal) = variants.iter().find(|v| v.ident == INTERNAL_VARIANT) else {
        return quote! {};
    };
    let cfg_attrs = &internal.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
        }
        #(#cfg_attrs)*
        impl From<String> for #name {
            #[inline]
            fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
        }
    }
}

fn status_impl(name: &Ident, variants: &[ErrorVariant]) -> TokenStream {
    if variants.iter().all(|v| v.status.is_none()) {
        return quote! {};
    }

    let arms = variants.iter().filter_map(|v| {
        let ident = &v.ident;
        let cfg_attrs = &v.cfg_attrs;
        match v.status.as_ref()? {
            StatusMapping::Fixed(kind) => Some(quote! {
                #(#cfg_attrs)* Self::#ident { .. } => ::kiosk_domain::LoadStatus::#kind,
            }),
            StatusMapping::FromSource => {
                let (field, _) = v.source.as_ref()?;
                Some(quote! { #(#cfg_attrs)* Self::#ident { #field, .. } => #field.status(), })
            },
        }
    });

    quote! {
        #[automatically_derived]
        impl #name {
            /// Maps this error onto the load status reported at the repository boundary.
            #[must_use]
            #[allow(unreachable_patterns)]
            pub fn status(&self) -> ::kiosk_domain::LoadStatus {
                match self {
                    #( #arms )*
                    _ => ::kiosk_domain::LoadStatus::UnexpectedError,
                }
            }
        }
    }
}
