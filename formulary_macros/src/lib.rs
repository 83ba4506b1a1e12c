use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, FnArg, ItemFn, Pat, PatType, ReturnType, Type};

fn returns_result(output: &ReturnType, fn_name: &str) -> bool {
    match output {
        ReturnType::Type(_, ty) => match **ty {
            Type::Path(ref type_path) => type_path
                .path
                .segments
                .last()
                .map(|segment| segment.ident == "Result")
                .unwrap_or(false),
            _ => panic!("Unsupported return type for {}", fn_name),
        },
        ReturnType::Default => panic!(
            "{} must return f64 or Result<f64, FormulaError>",
            fn_name
        ),
    }
}

/// Turns a plain `f64` function into a registry entry.
///
/// `fn pow(base: f64, exponent: f64) -> f64` keeps its definition and gains a
/// sibling constant `POW: Builtin` whose `apply` checks the argument count
/// before forwarding. Functions may also return `Result<f64, FormulaError>`
/// when they reject part of their domain themselves.
#[proc_macro_attribute]
pub fn formula_fn(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let vis = &input.vis;
    let fn_name = &input.sig.ident;
    let exported_name = fn_name.to_string();
    let const_name = format_ident!("{}", exported_name.to_uppercase());

    let mut arg_names = Vec::new();
    for arg in input.sig.inputs.iter() {
        match arg {
            FnArg::Typed(PatType { pat, ty, .. }) => {
                let arg_name = match **pat {
                    Pat::Ident(ref ident) => ident.ident.clone(),
                    _ => panic!("Unsupported pattern in {}", exported_name),
                };
                match **ty {
                    Type::Path(ref type_path) if type_path.path.is_ident("f64") => {}
                    _ => panic!(
                        "Expected argument '{}' of {} to be f64",
                        arg_name, exported_name
                    ),
                }
                arg_names.push(arg_name);
            }
            FnArg::Receiver(_) => panic!("{} cannot take self", exported_name),
        }
    }

    let arity = arg_names.len();
    let indices = 0..arity;
    let call = if returns_result(&input.sig.output, &exported_name) {
        quote! { #fn_name(#(#arg_names),*) }
    } else {
        quote! { ::core::result::Result::Ok(#fn_name(#(#arg_names),*)) }
    };

    let expanded = quote! {
        #input

        #vis const #const_name: crate::functions::Builtin = crate::functions::Builtin {
            name: #exported_name,
            arity: #arity,
            apply: {
                fn apply(
                    args: &[f64],
                ) -> ::core::result::Result<f64, crate::error::FormulaError> {
                    if args.len() != #arity {
                        return ::core::result::Result::Err(
                            crate::error::FormulaError::arity(#exported_name, #arity, args.len(), None),
                        );
                    }

                    #(let #arg_names = args[#indices];)*

                    #call
                }
                apply
            },
        };
    };

    TokenStream::from(expanded)
}
