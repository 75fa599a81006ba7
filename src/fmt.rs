use crate::models::{FieldTag, Record};

fn is_display_field(tag: FieldTag) -> bool {
    !matches!(tag, FieldTag::BEGIN | FieldTag::CHECK_NUMBER | FieldTag::END)
}

fn label(tag: FieldTag) -> String {
    match tag {
        FieldTag::DATE => "Date".to_string(),
        FieldTag::PAYEE => "Payee".to_string(),
        FieldTag::AMOUNT => "Amount".to_string(),
        FieldTag::CATEGORY => "Category".to_string(),
        other => other.to_string(),
    }
}

/// `<tag>: <value>` per line, markers and check number left out.
pub fn pretty_format(txn: &Record) -> String {
    txn.fields()
        .filter(|(tag, _)| is_display_field(*tag))
        .map(|(tag, value)| format!("{tag}: {value}\n"))
        .collect()
}

/// Labelled fields for the review table.
pub fn review_rows(txn: &Record) -> Vec<(String, &str)> {
    txn.fields()
        .filter(|(tag, _)| is_display_field(*tag))
        .map(|(tag, value)| (label(tag), value))
        .collect()
}
