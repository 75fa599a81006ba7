use std::io::{BufRead, Write};

use csv::StringRecord;

use crate::error::{QifcatError, Result};
use crate::models::{FieldTag, Record, NOT_APPLICABLE, TRANSACTION_ORDER};
use crate::settings::AccountConfig;

const ACCOUNT_HEADER: &str = "!Account";
const TYPE_HEADER: &str = "!Type";
const RECORD_END: &str = "^";

/// An account header, its transactions, and the `!Type` label between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QifDocument {
    pub header: Record,
    pub transactions: Vec<Record>,
    pub transaction_type: Option<String>,
}

impl QifDocument {
    /// Parse a QIF stream. Lines before any `!Account` section are read as
    /// transactions.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut doc = QifDocument::default();
        let mut in_account_section = false;
        let mut current = Record::new();
        let mut line_no = 0;

        for line in reader.lines() {
            line_no += 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line == ACCOUNT_HEADER {
                in_account_section = true;
                doc.header = Record::new();
                doc.header.set(FieldTag::AccountMarker, "");
            } else if line.starts_with(TYPE_HEADER) {
                let label = line.split(':').nth(1).ok_or_else(|| QifcatError::Format {
                    line: line_no,
                    message: format!("missing ':<type>' in '{line}'"),
                })?;
                doc.transaction_type = Some(label.to_string());
            } else if line == RECORD_END {
                if in_account_section {
                    doc.header.set(FieldTag::END, "");
                    in_account_section = false;
                } else {
                    current.set(FieldTag::END, "");
                    doc.transactions.push(std::mem::take(&mut current));
                }
            } else {
                let (tag, value) = split_field(line).ok_or_else(|| QifcatError::Format {
                    line: line_no,
                    message: "line has no field tag".to_string(),
                })?;
                if in_account_section {
                    doc.header.set(tag, value);
                } else {
                    current.set(tag, value);
                }
            }
        }

        if !current.is_empty() {
            return Err(QifcatError::Format {
                line: line_no,
                message: "last transaction is missing its '^' terminator".to_string(),
            });
        }
        Ok(doc)
    }

    /// Build a document from CSV rows: one uncategorized transaction per row.
    pub fn from_rows(rows: &[StringRecord], cfg: &AccountConfig) -> Result<Self> {
        let mut header = Record::new();
        header.set(FieldTag::AccountMarker, "");
        header.set(FieldTag::ACCOUNT_NAME, cfg.full_account_name.as_str());
        header.set(FieldTag::ACCOUNT_TYPE, cfg.account_type.as_str());
        header.set(FieldTag::END, "");

        let mut transactions = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            let cell = |column: usize| {
                row.get(column).ok_or(QifcatError::ColumnOutOfRange {
                    row: row_idx + 1,
                    column,
                    width: row.len(),
                })
            };
            let mut txn = Record::new();
            txn.set(FieldTag::BEGIN, "");
            txn.set(FieldTag::DATE, cell(cfg.colspec.date)?);
            txn.set(FieldTag::CHECK_NUMBER, NOT_APPLICABLE);
            txn.set(FieldTag::PAYEE, cell(cfg.colspec.name)?);
            txn.set(FieldTag::AMOUNT, cell(cfg.colspec.amount)?);
            txn.set(FieldTag::END, "");
            transactions.push(txn);
        }

        Ok(Self {
            header,
            transactions,
            transaction_type: Some(cfg.account_type.clone()),
        })
    }

    /// Write the header in capture order, the `!Type` line, then every
    /// transaction in canonical field order. Fields outside the canonical set
    /// are not written.
    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        for (tag, value) in self.header.fields() {
            writeln!(out, "{tag}{value}")?;
        }
        if let Some(kind) = &self.transaction_type {
            writeln!(out, "{TYPE_HEADER}:{kind}")?;
        }
        for txn in &self.transactions {
            for (tag, value) in txn.ordered(&TRANSACTION_ORDER) {
                writeln!(out, "{tag}{value}")?;
            }
        }
        out.flush()?;
        Ok(())
    }

    pub fn account_name(&self) -> Option<&str> {
        self.header.get(FieldTag::ACCOUNT_NAME)
    }
}

fn split_field(line: &str) -> Option<(FieldTag, &str)> {
    let mut chars = line.chars();
    let tag = chars.next()?;
    Some((FieldTag::Code(tag), chars.as_str().trim()))
}
