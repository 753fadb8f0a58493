//! Procedural macros for Courier.
//!
//! - `#[task]` - expose a plain function as a `courier::Task`

use proc_macro::TokenStream;

mod task;

/// Turn a function into a unit struct implementing `courier::Task`.
///
/// The function takes one argument, `&[u8]`, `Vec<u8>`, `&str` or `String`,
/// and returns anything implementing `courier::IntoTaskOutput`. Text
/// arguments fail the task when the input is not valid UTF-8.
///
/// # Arguments
///
/// - `name = "Ident"` - name of the generated struct (defaults to the
///   function name)
///
/// # Example
///
/// ```rust,ignore
/// #[courier::task]
/// fn shout(input: &str) -> String {
///     input.to_uppercase()
/// }
///
/// let handler = Handler::publisher(target, bus, shout);
/// ```
#[proc_macro_attribute]
pub fn task(attr: TokenStream, item: TokenStream) -> TokenStream {
    task::task_impl(attr, item)
}
