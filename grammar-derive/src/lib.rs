use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitStr,
    PathArguments, Type,
};

/// Derive macro for grammar rules.
///
/// The struct attribute carries the combinator marker and the optional drop
/// filter; field attributes carry the token, separator and size directives.
/// Field cardinality is read off the field type: `Option<T>` is optional,
/// `Vec<T>` is repeated, anything else is a single required match.
///
/// ```rust
/// #[derive(Debug, Default, Rule)]
/// #[rule(seq, drop = "space")]
/// struct Array {
///     #[rule(tok = "op,[")]
///     open: Match,
///     #[rule(sep = "op,,")]
///     items: Vec<Json>,
///     #[rule(tok = "op,]")]
///     close: Match,
/// }
/// ```
///
/// Directive strings are not interpreted here. They are handed to the rule
/// descriptor compiler at runtime, which reports malformed grammars.
#[proc_macro_derive(Rule, attributes(rule))]
pub fn derive_rule(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

enum Cardinality {
    Single,
    Optional,
    Repeated,
}

struct RuleField<'a> {
    ident: &'a Ident,
    base: &'a Type,
    cardinality: Cardinality,
    tok: String,
    sep: String,
    size: String,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "grammar rules cannot be generic",
        ));
    }

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Rule can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Rule can only be derived for structs",
            ))
        }
    };

    let marker = parse_marker(&input.attrs)?;
    let mut fields = Vec::with_capacity(named.len());
    for field in named {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let (cardinality, base) = classify(&field.ty)?;
        let directives = parse_field_directives(&field.attrs)?;
        fields.push(RuleField {
            ident,
            base,
            cardinality,
            tok: directives.tok,
            sep: directives.sep,
            size: directives.size,
        });
    }

    let rule_name = name.to_string();
    let marker_tokens = match marker {
        Some((combinator, drop)) => {
            let combinator = match combinator {
                Combinator::OneOf => quote!(::grammar::Combinator::OneOf),
                Combinator::Seq => quote!(::grammar::Combinator::Seq),
            };
            quote! {
                ::std::option::Option::Some(::grammar::Marker {
                    combinator: #combinator,
                    drop: #drop,
                })
            }
        }
        None => quote!(::std::option::Option::None),
    };

    let declarations = fields.iter().map(|field| {
        let field_name = field.ident.to_string();
        let base = field.base;
        let base_name = quote!(#base).to_string().replace(' ', "");
        let cardinality = match field.cardinality {
            Cardinality::Single => quote!(::grammar::Cardinality::Single),
            Cardinality::Optional => quote!(::grammar::Cardinality::Optional),
            Cardinality::Repeated => quote!(::grammar::Cardinality::Repeated),
        };
        let (tok, sep, size) = (&field.tok, &field.sep, &field.size);
        quote! {
            ::grammar::FieldDeclaration {
                name: #field_name,
                base_type: #base_name,
                cardinality: #cardinality,
                tok: #tok,
                sep: #sep,
                size: #size,
            }
        }
    });

    let parse_arms = fields.iter().enumerate().map(|(index, field)| {
        let ident = field.ident;
        let base = field.base;
        let parsed = quote!(<#base as ::grammar::Rule>::parse(state, opts)?);
        let store = match field.cardinality {
            Cardinality::Single => quote!(self.#ident = #parsed;),
            Cardinality::Optional => quote!(self.#ident = ::std::option::Option::Some(#parsed);),
            Cardinality::Repeated => quote!(self.#ident.push(#parsed);),
        };
        quote! {
            #index => {
                #store
                ::std::result::Result::Ok(())
            }
        }
    });

    let view_arms = fields.iter().enumerate().map(|(index, field)| {
        let ident = field.ident;
        let view = match field.cardinality {
            Cardinality::Single => quote!(::grammar::FieldView::Single(&self.#ident)),
            Cardinality::Optional => quote! {
                ::grammar::FieldView::Optional(
                    self.#ident.as_ref().map(|value| value as &dyn ::grammar::PrettyWrite),
                )
            },
            Cardinality::Repeated => quote! {
                ::grammar::FieldView::Repeated(
                    self.#ident
                        .iter()
                        .map(|item| item as &dyn ::grammar::PrettyWrite)
                        .collect(),
                )
            },
        };
        quote!(#index => #view,)
    });

    Ok(quote! {
        impl ::grammar::Declared for #name {
            fn declaration() -> ::grammar::Declaration {
                ::grammar::Declaration {
                    name: #rule_name,
                    marker: #marker_tokens,
                    fields: ::std::vec![#(#declarations),*],
                }
            }

            fn parse_field(
                &mut self,
                index: usize,
                state: &mut ::grammar::ParserState<'_>,
                opts: &::grammar::TokenOptions,
            ) -> ::std::result::Result<(), ::grammar::ParseError> {
                match index {
                    #(#parse_arms)*
                    _ => ::std::result::Result::Err(state.error_here(::grammar::Cause::Message(
                        ::std::format!("{} has no field #{}", #rule_name, index),
                    ))),
                }
            }

            fn field_view(&self, index: usize) -> ::grammar::FieldView<'_> {
                match index {
                    #(#view_arms)*
                    _ => ::grammar::FieldView::Optional(::std::option::Option::None),
                }
            }
        }

        impl ::grammar::Rule for #name {
            fn parse(
                state: &mut ::grammar::ParserState<'_>,
                opts: &::grammar::TokenOptions,
            ) -> ::std::result::Result<Self, ::grammar::ParseError> {
                ::grammar::parsing::engine::parse_declared::<Self>(state, opts)
            }

            fn drop_filter() -> ::std::option::Option<&'static ::grammar::TokenOptions> {
                ::std::option::Option::Some(&::grammar::ruledef::descriptor::<Self>().drop)
            }
        }

        impl ::grammar::PrettyWrite for #name {
            fn pretty_write(
                &self,
                printer: &mut ::grammar::PrettyPrinter<'_>,
            ) -> ::std::fmt::Result {
                ::grammar::formats::pretty::write_declared(self, printer)
            }
        }
    })
}

enum Combinator {
    OneOf,
    Seq,
}

fn parse_marker(attrs: &[Attribute]) -> syn::Result<Option<(Combinator, String)>> {
    let mut combinator = None;
    let mut drop = String::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("rule")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("one_of") || meta.path.is_ident("seq") {
                if combinator.is_some() {
                    return Err(meta.error("a rule takes exactly one of `one_of` or `seq`"));
                }
                combinator = Some(if meta.path.is_ident("one_of") {
                    Combinator::OneOf
                } else {
                    Combinator::Seq
                });
                Ok(())
            } else if meta.path.is_ident("drop") {
                let value: LitStr = meta.value()?.parse()?;
                drop = value.value();
                Ok(())
            } else {
                Err(meta.error("expected `one_of`, `seq` or `drop = \"...\"`"))
            }
        })?;
    }
    Ok(combinator.map(|combinator| (combinator, drop)))
}

#[derive(Default)]
struct FieldDirectives {
    tok: String,
    sep: String,
    size: String,
}

fn parse_field_directives(attrs: &[Attribute]) -> syn::Result<FieldDirectives> {
    let mut directives = FieldDirectives::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("rule")) {
        attr.parse_nested_meta(|meta| {
            let slot = if meta.path.is_ident("tok") {
                &mut directives.tok
            } else if meta.path.is_ident("sep") {
                &mut directives.sep
            } else if meta.path.is_ident("size") {
                &mut directives.size
            } else {
                return Err(meta.error("expected `tok`, `sep` or `size`"));
            };
            let value: LitStr = meta.value()?.parse()?;
            *slot = value.value();
            Ok(())
        })?;
    }
    Ok(directives)
}

/// Splits a field type into its cardinality and the rule type it holds.
fn classify(ty: &Type) -> syn::Result<(Cardinality, &Type)> {
    let Type::Path(path) = ty else {
        return Ok((Cardinality::Single, ty));
    };
    let Some(last) = path.path.segments.last() else {
        return Ok((Cardinality::Single, ty));
    };
    let cardinality = if last.ident == "Option" {
        Cardinality::Optional
    } else if last.ident == "Vec" {
        Cardinality::Repeated
    } else {
        return Ok((Cardinality::Single, ty));
    };
    let base = match &last.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(base) => Some(base),
            _ => None,
        }),
        _ => None,
    };
    match base {
        Some(base) => Ok((cardinality, base)),
        None => Err(syn::Error::new_spanned(
            ty,
            "cannot resolve the rule type held by this field",
        )),
    }
}
