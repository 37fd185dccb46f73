use darling::{ast, FromMeta};
use proc_macro::TokenStream;
use quote::{format_ident, quote};

#[derive(FromMeta)]
struct RouteArgs {
	#[darling(multiple)]
	tag: Vec<syn::Expr>,
	#[darling(multiple)]
	response: Vec<ResponseArgs>,
}

#[derive(FromMeta)]
struct ResponseArgs {
	status: syn::LitInt,
	shape: Option<syn::Type>,
	description: Option<String>,
}

struct Docs {
	summary: String,
	description: Option<String>,
}

pub fn from_input(args: TokenStream, input: TokenStream) -> TokenStream {
	let args = match ast::NestedMeta::parse_meta_list(args.into()) {
		Ok(args) => args,
		Err(e) => return e.into_compile_error().into(),
	};

	let args = match RouteArgs::from_list(&args) {
		Ok(args) => args,
		Err(e) => return e.write_errors().into(),
	};

	let function = syn::parse_macro_input!(input as syn::ItemFn);
	let docs = match Docs::from_attrs(&function.sig.ident, &function.attrs) {
		Ok(docs) => docs,
		Err(e) => return e.into_compile_error().into(),
	};

	let fn_name = format_ident!("{}_docs", function.sig.ident);
	let fn_vis = &function.vis;

	let summary = docs.summary;
	let description = docs.description.map(|description| {
		quote! {
			.description(#description)
		}
	});

	let tags = args.tag.iter();
	let responses = args.response.into_iter().map(|response| {
		let status = response.status;
		let shape = response.shape.map_or_else(|| quote!(()), |shape| quote!(#shape));

		match response.description {
			Some(description) => quote! {
				.response_with::<#status, #shape, _>(|res| res.description(#description))
			},
			None => quote! {
				.response::<#status, #shape>()
			},
		}
	});

	quote! {
		#function

		#fn_vis fn #fn_name(op: aide::transform::TransformOperation) -> aide::transform::TransformOperation {
			op.summary(#summary)
				#description
				#(
					.tag(#tags)
				)*
				#(
					#responses
				)*
		}
	}
	.into()
}

impl Docs {
	/// Splits the doc comment into a one-line summary and an optional description.
	fn from_attrs(ident: &syn::Ident, attrs: &[syn::Attribute]) -> syn::Result<Self> {
		let lines = attrs
			.iter()
			.filter(|attr| attr.path().is_ident("doc"))
			.filter_map(|attr| match &attr.meta {
				syn::Meta::NameValue(syn::MetaNameValue {
					value:
						syn::Expr::Lit(syn::ExprLit {
							lit: syn::Lit::Str(literal),
							..
						}),
					..
				}) => Some(literal.value().trim().to_owned()),
				_ => None,
			})
			.collect::<Vec<_>>();

		let mut lines = lines.iter().skip_while(|line| line.is_empty());

		let Some(summary) = lines.next() else {
			return Err(syn::Error::new_spanned(
				ident,
				"routes need a doc comment, its first line is used as the summary",
			));
		};

		let description = lines
			.map(String::as_str)
			.collect::<Vec<_>>()
			.join("\n")
			.trim()
			.to_owned();

		Ok(Self {
			summary: summary.clone(),
			description: (!description.is_empty()).then_some(description),
		})
	}
}
