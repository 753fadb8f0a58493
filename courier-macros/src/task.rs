//! `#[task]` - turn a plain function into a `courier::Task`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    FnArg, GenericArgument, Ident, ItemFn, LitStr, PathArguments, ReturnType, Token, Type,
    parse::Parse, parse_macro_input,
};

/// Arguments for the `#[task]` macro.
pub(crate) struct TaskArgs {
    pub name: Option<String>,
}

impl Parse for TaskArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut name = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "name" => {
                    let lit: LitStr = input.parse()?;
                    name = Some(lit.value());
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(TaskArgs { name })
    }
}

/// How the raw input bytes reach the function argument.
enum InputKind {
    Bytes,
    OwnedBytes,
    Text,
    OwnedText,
}

impl InputKind {
    fn of(ty: &Type) -> Option<Self> {
        match ty {
            Type::Reference(reference) if reference.mutability.is_none() => {
                match &*reference.elem {
                    Type::Slice(slice) if is_ident(&slice.elem, "u8") => Some(InputKind::Bytes),
                    elem if is_ident(elem, "str") => Some(InputKind::Text),
                    _ => None,
                }
            }
            Type::Path(path) => {
                let last = path.path.segments.last()?;
                match last.ident.to_string().as_str() {
                    "String" if last.arguments.is_empty() => Some(InputKind::OwnedText),
                    "Vec" => match &last.arguments {
                        PathArguments::AngleBracketed(args) if args.args.len() == 1 => {
                            match args.args.first()? {
                                GenericArgument::Type(inner) if is_ident(inner, "u8") => {
                                    Some(InputKind::OwnedBytes)
                                }
                                _ => None,
                            }
                        }
                        _ => None,
                    },
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn conversion(&self) -> proc_macro2::TokenStream {
        let text = quote! {
            ::std::str::from_utf8(__input).map_err(|e| {
                ::std::boxed::Box::new(::courier::TaskError::from(e)) as ::courier::BoxError
            })?
        };
        match self {
            InputKind::Bytes => quote! { __input },
            InputKind::OwnedBytes => quote! { __input.to_vec() },
            InputKind::Text => text,
            InputKind::OwnedText => quote! { #text.to_owned() },
        }
    }
}

fn is_ident(ty: &Type, name: &str) -> bool {
    matches!(ty, Type::Path(path) if path.qself.is_none() && path.path.is_ident(name))
}

fn error(tokens: impl quote::ToTokens, message: &str) -> TokenStream {
    syn::Error::new_spanned(tokens, message)
        .to_compile_error()
        .into()
}

/// Implementation of the `#[task]` macro.
pub fn task_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as TaskArgs);
    let input = parse_macro_input!(item as ItemFn);

    let fn_name = &input.sig.ident;
    let fn_vis = &input.vis;
    let fn_block = &input.block;
    let sig = &input.sig;

    if let Some(asyncness) = &sig.asyncness {
        return error(asyncness, "Task function must not be async");
    }
    if !sig.generics.params.is_empty() {
        return error(&sig.generics, "Task function must not be generic");
    }

    let output = match &sig.output {
        ReturnType::Type(_, ty) => ty,
        ReturnType::Default => {
            return error(
                sig,
                "Task function must return its output: Vec<u8>, String, &'static str or a Result",
            );
        }
    };

    if sig.inputs.len() != 1 {
        return error(
            &sig.inputs,
            "Task function must take exactly one argument: &[u8], Vec<u8>, &str or String",
        );
    }
    let (arg_pat, arg_ty) = match sig.inputs.first() {
        Some(FnArg::Typed(pat_type)) => (&pat_type.pat, &pat_type.ty),
        _ => return error(&sig.inputs, "Task function must be a free function"),
    };

    let Some(kind) = InputKind::of(arg_ty) else {
        return error(arg_ty, "Task input must be &[u8], Vec<u8>, &str or String");
    };
    let conversion = kind.conversion();

    let struct_name = if let Some(ref custom_name) = args.name {
        Ident::new(custom_name, fn_name.span())
    } else {
        fn_name.clone()
    };

    let docs = input.attrs.iter().filter(|attr| attr.path().is_ident("doc"));

    let expanded = quote! {
        #(#docs)*
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Default)]
        #fn_vis struct #struct_name;

        impl #struct_name {
            #[doc(hidden)]
            fn __run(#arg_pat: #arg_ty) -> #output #fn_block
        }

        impl ::courier::Task for #struct_name {
            fn execute(
                &self,
                __input: &[u8],
            ) -> ::core::result::Result<::std::vec::Vec<u8>, ::courier::BoxError> {
                let __arg = #conversion;
                ::courier::IntoTaskOutput::into_task_output(Self::__run(__arg))
            }
        }
    };

    TokenStream::from(expanded)
}
