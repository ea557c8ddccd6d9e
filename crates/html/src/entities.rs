//! HTML character reference decoding
//!
//! Resolves the text between `&` and `;`: `#x41`, `#65` or a name like `amp`.

use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::sync::LazyLock;

use crate::named_references::NAMED_REFERENCES;

/// Name → replacement text lookup table
pub type NamedReferenceTable = FxHashMap<&'static str, &'static str>;

static HTML_REFERENCES: LazyLock<NamedReferenceTable> =
    LazyLock::new(|| NAMED_REFERENCES.iter().copied().collect());

/// The full HTML named character reference table, built on first use.
pub fn named_references() -> &'static NamedReferenceTable {
    &HTML_REFERENCES
}

/// Decodes character references against a name table.
#[derive(Debug, Clone, Copy)]
pub struct EntityResolver<'t> {
    named: &'t NamedReferenceTable,
}

impl<'t> EntityResolver<'t> {
    pub fn new(named: &'t NamedReferenceTable) -> Self {
        Self { named }
    }

    /// Decode a reference, given without its `&` and `;` delimiters.
    ///
    /// Returns `None` for anything that is not a well-formed reference or
    /// names an unknown entity; callers then keep the `&` as literal text.
    pub fn resolve(&self, reference: &str) -> Option<Cow<'static, str>> {
        if let Some(digits) = reference.strip_prefix('#') {
            let (digits, radix) = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => (hex, 16),
                None => (digits, 10),
            };
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return None;
            }
            let value = u32::from_str_radix(digits, radix).unwrap_or(u32::MAX);
            return Some(Cow::Owned(decode_numeric(value).to_string()));
        }

        if reference.is_empty() || !reference.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        self.named.get(reference).map(|text| Cow::Borrowed(*text))
    }
}

impl EntityResolver<'static> {
    /// Resolver over the full HTML table
    pub fn html() -> Self {
        Self::new(named_references())
    }
}

impl Default for EntityResolver<'static> {
    fn default() -> Self {
        Self::html()
    }
}

/// Map a numeric character reference to the code point it names.
///
/// Values with no `char` (surrogates, anything past U+10FFFF) decode to U+FFFD.
pub fn decode_numeric(value: u32) -> char {
    char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
}
