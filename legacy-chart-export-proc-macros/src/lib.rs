mod section;

use proc_macro::TokenStream;


/// writes a struct as a `[Section]` of `Key: Value` pairs
///
/// struct level: `#[legacy(section = "General", separator = ": ")]`
///
/// field level: `#[legacy(key = "AudioFilename", since = 14)]`.
/// keys default to the field name in PascalCase, `since` defaults to 0 (always written)
#[proc_macro_derive(LegacySection, attributes(legacy))]
pub fn derive_legacy_section(input: TokenStream) -> TokenStream {
    let ast = match syn::parse::<syn::DeriveInput>(input) {
        Ok(ast) => ast,
        Err(e) => return e.into_compile_error().into(),
    };

    match section::derive(&ast) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.into_compile_error().into(),
    }
}
