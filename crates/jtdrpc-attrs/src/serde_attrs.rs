//! The subset of serde attributes that changes the serialized shape

use crate::rename::RenameRule;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Token};

/// `#[serde(...)]` keys read from a container, field or variant.
///
/// Keys that do not change the serialized shape are skipped.
#[derive(Debug, Default, PartialEq)]
pub struct SerdeAttrs {
    /// Serialize-side `rename`
    pub rename: Option<String>,
    /// Serialize-side `rename_all`, kept as a literal for error spans
    pub rename_all: Option<LitStr>,
    /// `skip` or `skip_serializing`
    pub skip: bool,
    pub skip_serializing_if: bool,
    pub flatten: bool,
    pub transparent: bool,
}

impl SerdeAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| out.read_key(&meta))?;
        }
        Ok(out)
    }

    fn read_key(&mut self, meta: &ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("rename") {
            self.rename = serialize_name(meta)?.map(|lit| lit.value());
        } else if meta.path.is_ident("rename_all") {
            self.rename_all = serialize_name(meta)?;
        } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
            self.skip = true;
        } else if meta.path.is_ident("skip_serializing_if") {
            self.skip_serializing_if = true;
            meta.value()?.parse::<LitStr>()?;
        } else if meta.path.is_ident("flatten") {
            self.flatten = true;
        } else if meta.path.is_ident("transparent") {
            self.transparent = true;
        } else {
            skip_meta_value(meta)?;
        }
        Ok(())
    }

    /// The `rename_all` rule, or an error spanning an unknown rule name
    pub fn rename_rule(&self) -> syn::Result<Option<RenameRule>> {
        let Some(lit) = &self.rename_all else {
            return Ok(None);
        };
        let rule = lit.value();
        RenameRule::parse(&rule).map(Some).ok_or_else(|| {
            syn::Error::new_spanned(lit, format!("unknown rename rule `{rule}`"))
        })
    }
}

/// Reads `key = "x"` or `key(serialize = "x", deserialize = "y")`, keeping the
/// serialize side
fn serialize_name(meta: &ParseNestedMeta) -> syn::Result<Option<LitStr>> {
    if meta.input.peek(Token![=]) {
        return Ok(Some(meta.value()?.parse()?));
    }
    let mut name = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("serialize") {
            name = Some(inner.value()?.parse()?);
        } else {
            skip_meta_value(&inner)?;
        }
        Ok(())
    })?;
    Ok(name)
}

/// Consume the value of a key the caller does not interpret
pub fn skip_meta_value(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let _content;
        syn::parenthesized!(_content in meta.input);
    }
    Ok(())
}

/// Identifier text without a raw `r#` prefix
pub fn unraw(ident: &syn::Ident) -> String {
    let s = ident.to_string();
    s.strip_prefix("r#").map(str::to_string).unwrap_or(s)
}
