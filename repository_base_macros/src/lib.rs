mod entity;

use proc_macro::TokenStream;

/// Derive macro for the `Entity` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Default, Serialize, Deserialize, Entity)]
/// #[repository(kind = "User")]
/// struct User {
///     #[repository(id)]
///     pub id: i64,
///     pub name: String,
/// }
/// ```
///
/// - `#[repository(id)]` marks the identifier field. Fields are scanned in
///   reverse declaration order and the first marked field of type `i64` or
///   `String` wins. Marked fields of any other type are skipped.
/// - `#[repository(kind = "...")]` sets the kind name.
///   If omitted, defaults to the struct name.
/// - `#[serde(rename = "...")]` on the identifier field is picked up as the
///   stored field name.
#[proc_macro_derive(Entity, attributes(repository))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity(input)
}
