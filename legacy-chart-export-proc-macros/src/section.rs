use syn::*;
use quote::*;
use proc_macro2::TokenStream;

const LEGACY_ATTRIBUTE: &str = "legacy";

const SECTION_ATTRIBUTE: &str = "section";
const SEPARATOR_ATTRIBUTE: &str = "separator";
const KEY_ATTRIBUTE: &str = "key";
const SINCE_ATTRIBUTE: &str = "since";

const DEFAULT_SEPARATOR: &str = ":";


pub fn derive(ast: &syn::DeriveInput) -> Result<TokenStream> {
    let struct_name = &ast.ident;
    let struct_attrs = StructAttributes::parse(&ast.attrs)?;

    let section = struct_attrs.section.unwrap_or_else(|| struct_name.to_string());
    let separator = struct_attrs.separator.unwrap_or_else(|| DEFAULT_SEPARATOR.to_owned());

    let mut writes = Vec::new();

    let Data::Struct(data) = &ast.data else {
        return Err(Error::new_spanned(struct_name, "LegacySection can only be derived for structs"));
    };

    for field in data.fields.iter() {
        let Some(name) = field.ident.as_ref() else {
            return Err(Error::new_spanned(field, "LegacySection fields must be named"));
        };
        let attrs = FieldAttributes::parse(&field.attrs)?;

        let key = attrs.key.unwrap_or_else(|| to_pascal(&name.to_string()));
        let write = quote! { lw.write_pair(#key, #separator, &self.#name); };

        // ungated fields skip the version check entirely
        writes.push(match attrs.since {
            0 => write,
            since => quote! { if lw.version() >= #since { #write } },
        });
    }

    let tokens = quote! {
        impl LegacySection for #struct_name {
            const SECTION: &'static str = #section;

            fn write_section(&self, lw: &mut LegacyWriter) {
                lw.begin_section(Self::SECTION);
                #( #writes )*
            }
        }
    };

    #[cfg(feature="section_logging")] {
        let _ = std::fs::create_dir_all("debug");
        let _ = std::fs::write(format!("debug/{struct_name}.rs"), tokens.to_string());
    }

    Ok(tokens)
}


fn to_pascal(s: &str) -> String {
    let mut pascal = String::with_capacity(s.len());
    let mut upper = true;
    for i in s.chars() {
        if i == '_' {
            upper = true;
        } else if upper {
            pascal.push(i.to_ascii_uppercase());
            upper = false;
        } else {
            pascal.push(i)
        }
    }

    pascal
}

#[derive(Default)]
struct StructAttributes {
    section: Option<String>,
    separator: Option<String>,
}
impl StructAttributes {
    fn parse(attrs: &[Attribute]) -> Result<Self> {
        let mut this = Self::default();

        for a in attrs {
            if !a.path().is_ident(LEGACY_ATTRIBUTE) { continue }

            a.parse_nested_meta(|meta| {
                if meta.path.is_ident(SECTION_ATTRIBUTE) {
                    let value: LitStr = meta.value()?.parse()?;
                    this.section = Some(value.value());
                } else if meta.path.is_ident(SEPARATOR_ATTRIBUTE) {
                    let value: LitStr = meta.value()?.parse()?;
                    this.separator = Some(value.value());
                } else {
                    return Err(meta.error("invalid attribute"))
                }

                Ok(())
            })?;
        }

        Ok(this)
    }
}

#[derive(Default)]
struct FieldAttributes {
    key: Option<String>,
    /// first format version this field is written for
    since: u32,
}
impl FieldAttributes {
    fn parse(attrs: &[Attribute]) -> Result<Self> {
        let mut this = Self::default();

        for a in attrs {
            if !a.path().is_ident(LEGACY_ATTRIBUTE) { continue }

            a.parse_nested_meta(|meta| {
                if meta.path.is_ident(KEY_ATTRIBUTE) {
                    let value: LitStr = meta.value()?.parse()?;
                    this.key = Some(value.value());
                } else if meta.path.is_ident(SINCE_ATTRIBUTE) {
                    let value: LitInt = meta.value()?.parse()?;
                    this.since = value.base10_parse()?;
                } else {
                    return Err(meta.error("invalid attribute"))
                }

                Ok(())
            })?;
        }

        Ok(this)
    }
}
