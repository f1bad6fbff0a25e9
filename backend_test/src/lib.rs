use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Transform an asynchronous test into a synchronous one, backed by a fresh
/// in-memory store, and inject dependencies.
///
/// Injectable dependencies are [`rocket::local::asynchronous::Client`] and
/// `crate::store::MemoryStore`. The store is seeded with the example fixture
/// unless the attribute is given the `empty` argument.
#[proc_macro_attribute]
pub fn backend_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract the arguments to pass, rejecting invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // The test keeps its name; the async body becomes `<name>_fut`.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();

    // Decide how the store starts out.
    let store_init = match parse_macro_input!(args as Option<Ident>) {
        Some(arg) if arg == "empty" => quote! {
            crate::store::MemoryStore::default()
        },
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected no argument or `empty`")
                .into_compile_error()
                .into();
        }
        None => quote! {
            crate::store::MemoryStore::seeded(crate::model::db::SeedData::example())
        },
    };

    quote! {
        #[test]
        fn #name() {
            async fn setup() -> (rocket::local::asynchronous::Client, crate::store::MemoryStore) {
                let store = #store_init;
                let rocket_client = rocket::local::asynchronous::Client::tracked(
                    crate::rocket_for_store(store.clone()),
                )
                .await
                .unwrap();
                (rocket_client, store)
            }

            #item_fn

            let runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("voter-guide-test")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async {
                #[allow(unused_variables)]
                let (rocket_client, store) = setup().await;
                #new_name(#(#test_args),*).await;
            });
        }
    }
    .into()
}

/// The injected argument for each parameter of an async test.
fn check_sig(sig: Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut has_client = false;
    let mut has_store = false;
    let mut args = vec![];

    for input in &sig.inputs {
        let pat_type = match input {
            FnArg::Typed(pat_type) => pat_type,
            FnArg::Receiver(_) => {
                return Err(syn::Error::new(
                    input.span(),
                    "Function argument must not be a receiver type",
                ));
            }
        };
        if !matches!(&*pat_type.pat, Pat::Ident(_)) {
            return Err(syn::Error::new(
                pat_type.pat.span(),
                "Function argument pattern must be an identifier",
            ));
        }
        let type_ident = match &*pat_type.ty {
            Type::Path(type_path) => type_path.path.segments.last().map(|s| s.ident.clone()),
            _ => None,
        };
        match type_ident {
            Some(ident) if ident == "Client" => {
                if has_client {
                    return Err(syn::Error::new(
                        input.span(),
                        "Test cannot accept more than one `rocket::local::asynchronous::Client`",
                    ));
                }
                has_client = true;
                args.push(quote! { rocket_client });
            }
            Some(ident) if ident == "MemoryStore" => {
                if has_store {
                    return Err(syn::Error::new(
                        input.span(),
                        "Test cannot accept more than one `MemoryStore`",
                    ));
                }
                has_store = true;
                args.push(quote! { store.clone() });
            }
            _ => {
                return Err(syn::Error::new(
                    pat_type.ty.span(),
                    "Expected either `Client` or `MemoryStore`",
                ));
            }
        }
    }

    Ok(args)
}
