mod model;
mod route;

use proc_macro::TokenStream;

/// Creates a documentation function for the route, named after the original function with the suffix `_docs`.
///
/// The first line of the doc comment becomes the operation summary and the rest its description.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates two input structs for the model: `CreateXInput` and `UpdateXInput`.
///
/// Fields marked `#[serde(skip_deserializing)]` or `#[serde(skip)]` are server-owned and left out.
/// The remaining fields keep their attributes; in the update input every field is wrapped in an `Option`.
#[proc_macro_attribute]
pub fn model(_args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(input)
}
