use std::fmt;

use indexmap::IndexMap;

/// A QIF line code. Every field line starts with a single character tag; the
/// account section opener is the only multi-character marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTag {
    AccountMarker,
    Code(char),
}

impl FieldTag {
    pub const ACCOUNT_NAME: FieldTag = FieldTag::Code('N');
    pub const ACCOUNT_TYPE: FieldTag = FieldTag::Code('T');
    pub const BEGIN: FieldTag = FieldTag::Code('C');
    pub const DATE: FieldTag = FieldTag::Code('D');
    pub const CHECK_NUMBER: FieldTag = FieldTag::Code('N');
    pub const PAYEE: FieldTag = FieldTag::Code('P');
    pub const AMOUNT: FieldTag = FieldTag::Code('T');
    pub const CATEGORY: FieldTag = FieldTag::Code('L');
    pub const END: FieldTag = FieldTag::Code('^');
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldTag::AccountMarker => f.write_str("!Account"),
            FieldTag::Code(c) => write!(f, "{c}"),
        }
    }
}

/// Output order for transaction fields, whatever order they were set in.
pub const TRANSACTION_ORDER: [FieldTag; 7] = [
    FieldTag::BEGIN,
    FieldTag::DATE,
    FieldTag::CHECK_NUMBER,
    FieldTag::PAYEE,
    FieldTag::AMOUNT,
    FieldTag::CATEGORY,
    FieldTag::END,
];

/// Check number written for rows adapted from a CSV export.
pub const NOT_APPLICABLE: &str = "N/A";

/// One account header or transaction. Fields keep the position of their first
/// insertion; setting an existing tag replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<FieldTag, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, tag: FieldTag, value: impl Into<String>) {
        self.fields.insert(tag, value.into());
    }

    pub fn get(&self, tag: FieldTag) -> Option<&str> {
        self.fields.get(&tag).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in capture order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldTag, &str)> {
        self.fields.iter().map(|(tag, value)| (*tag, value.as_str()))
    }

    /// Fields in `order`, skipping tags this record does not carry.
    pub fn ordered<'a>(
        &'a self,
        order: &'a [FieldTag],
    ) -> impl Iterator<Item = (FieldTag, &'a str)> + 'a {
        order
            .iter()
            .filter_map(move |tag| self.get(*tag).map(|value| (*tag, value)))
    }

    pub fn payee(&self) -> Option<&str> {
        self.get(FieldTag::PAYEE)
    }

    pub fn date(&self) -> Option<&str> {
        self.get(FieldTag::DATE)
    }

    pub fn amount(&self) -> Option<&str> {
        self.get(FieldTag::AMOUNT)
    }

    pub fn category(&self) -> Option<&str> {
        self.get(FieldTag::CATEGORY)
    }

    pub fn categorize(&mut self, category: impl Into<String>) {
        self.set(FieldTag::CATEGORY, category);
    }
}
