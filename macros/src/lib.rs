use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Ident, ItemFn, LitStr};

const USAGE: &str = "rxsignal_macro::test only accepts: #[rxsignal_macro::test], \
                     #[rxsignal_macro::test(local)], #[rxsignal_macro::test(shared)], or string \
                     equivalents";

/// Marks a test function.
///
/// Sync functions become plain `#[test]`s. Async functions run on tokio:
/// `local` (the default) on a current-thread runtime, `shared` on a
/// multi-thread runtime.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);

  let is_async = input.sig.asyncness.is_some();

  let raw_args = proc_macro2::TokenStream::from(attr);
  let tokio_args = if raw_args.is_empty() {
    proc_macro2::TokenStream::new()
  } else {
    if !is_async {
      return TokenStream::from(
        syn::Error::new(
          raw_args.span(),
          "rxsignal_macro::test flavor args are only supported for async tests. Use \
           #[rxsignal_macro::test] for sync tests, or make the function async.",
        )
        .to_compile_error(),
      );
    }

    let flavor = if let Ok(ident) = syn::parse2::<Ident>(raw_args.clone()) {
      (ident.to_string(), ident.span())
    } else if let Ok(lit) = syn::parse2::<LitStr>(raw_args.clone()) {
      (lit.value(), lit.span())
    } else {
      return TokenStream::from(syn::Error::new(raw_args.span(), USAGE).to_compile_error());
    };

    match flavor.0.as_str() {
      "local" => quote!(flavor = "current_thread"),
      "shared" => quote!(flavor = "multi_thread"),
      _ => return TokenStream::from(syn::Error::new(flavor.1, USAGE).to_compile_error()),
    }
  };

  let expanded = if is_async {
    quote! {
        #[tokio::test(#tokio_args)]
        #input
    }
  } else {
    quote! {
        #[test]
        #input
    }
  };

  TokenStream::from(expanded)
}
