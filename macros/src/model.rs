use darling::{ast, FromDeriveInput, FromField};
use proc_macro2::TokenTree;
use quote::{format_ident, quote, ToTokens};
use syn::Meta;

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named), forward_attrs)]
struct ModelInputReceiver {
	ident: syn::Ident,

	generics: syn::Generics,

	data: ast::Data<(), ModelFieldReceiver>,

	attrs: Vec<syn::Attribute>,
}

#[derive(Debug, FromField)]
#[darling(forward_attrs)]
struct ModelFieldReceiver {
	ident: Option<syn::Ident>,

	ty: syn::Type,
	vis: syn::Visibility,

	attrs: Vec<syn::Attribute>,
}

impl ModelFieldReceiver {
	/// Whether the field is filled in by the server rather than the client.
	fn is_server_owned(&self) -> bool {
		self.attrs.iter().any(|attr| {
			let Meta::List(ref list) = attr.meta else {
				return false;
			};

			list.path.is_ident("serde")
				&& list.tokens.to_token_stream().into_iter().any(|token| {
					matches!(token, TokenTree::Ident(ref ident) if ident == "skip_deserializing" || ident == "skip")
				})
		})
	}
}

/// Whether `ty` is written as `Option<..>`.
fn is_option(ty: &syn::Type) -> bool {
	let syn::Type::Path(path) = ty else {
		return false;
	};

	path.qself.is_none()
		&& path
			.path
			.segments
			.last()
			.is_some_and(|segment| segment.ident == "Option")
}

pub fn from_input(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = syn::parse_macro_input!(input as syn::DeriveInput);
	let receiver = match ModelInputReceiver::from_derive_input(&input) {
		Ok(receiver) => receiver,
		Err(e) => return e.write_errors().into(),
	};

	let ident = &receiver.ident;
	let vis = &input.vis;
	let generics = &receiver.generics;
	let create_ident = format_ident!("Create{}Input", ident);
	let update_ident = format_ident!("Update{}Input", ident);

	let create_doc = format!("Input for creating a [`{ident}`].");
	let update_doc = format!("Input for updating a [`{ident}`]. Missing fields are left unchanged.");

	// the model's own docs describe the model, not its inputs
	let attrs = receiver
		.attrs
		.iter()
		.filter(|attr| !attr.path().is_ident("doc"))
		.collect::<Vec<_>>();

	let Some(fields) = receiver.data.take_struct() else {
		return syn::Error::new_spanned(ident, "#[model] only supports structs with named fields")
			.into_compile_error()
			.into();
	};

	let fields = fields
		.iter()
		.filter(|field| !field.is_server_owned())
		.filter_map(|field| Some((&field.attrs, field.ident.as_ref()?, &field.ty, &field.vis)))
		.collect::<Vec<_>>();

	let create_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
		quote! {
			#(#attrs)*
			#vis #ident: #ty,
		}
	});

	// an optional field needs `null` (clear it) kept apart from a missing key (leave it)
	let update_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
		let present = is_option(ty).then(|| {
			quote! {
				#[serde(default, deserialize_with = "crate::route::model::present")]
			}
		});

		quote! {
			#(#attrs)*
			#present
			#vis #ident: Option<#ty>,
		}
	});

	quote! {
		#input

		#[doc = #create_doc]
		#(#attrs)*
		#vis struct #create_ident #generics {
			#(
				#create_fields
			)*
		}

		#[doc = #update_doc]
		#(#attrs)*
		#vis struct #update_ident #generics {
			#(
				#update_fields
			)*
		}
	}
	.into()
}
