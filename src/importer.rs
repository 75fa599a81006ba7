use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;
use sha2::{Digest, Sha256};

use crate::error::{QifcatError, Result};

pub const QIF_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

pub struct ImportedRows {
    pub rows: Vec<StringRecord>,
    pub range: DateRange,
}

pub fn parse_date_mdy(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), QIF_DATE_FORMAT)
        .map_err(|_| QifcatError::InvalidDate(raw.to_string()))
}

/// Read a bank export, skipping its header row, and sort the rows by the date
/// column. Rows on the same day keep their file order.
pub fn read_transactions(file_path: &Path, date_idx: usize) -> Result<ImportedRows> {
    let file = std::fs::File::open(file_path)?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));
    read_from(rdr, date_idx, file_path)
}

fn read_from<R: std::io::Read>(
    mut rdr: csv::Reader<R>,
    date_idx: usize,
    file_path: &Path,
) -> Result<ImportedRows> {
    let mut dated = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        let raw = record.get(date_idx).ok_or(QifcatError::ColumnOutOfRange {
            row: idx + 1,
            column: date_idx,
            width: record.len(),
        })?;
        dated.push((parse_date_mdy(raw)?, record));
    }
    dated.sort_by_key(|(date, _)| *date);

    let (Some((start, _)), Some((end, _))) = (dated.first(), dated.last()) else {
        return Err(QifcatError::EmptyInput(file_path.display().to_string()));
    };
    let range = DateRange {
        start: *start,
        end: *end,
    };
    Ok(ImportedRows {
        rows: dated.into_iter().map(|(_, record)| record).collect(),
        range,
    })
}

/// `<root>/<year>/<account>/<start>--<end>-<account>.<ext>`
pub fn output_path(root: &Path, year: i32, account_name: &str, range: &DateRange, ext: &str) -> PathBuf {
    root.join(year.to_string()).join(account_name).join(format!(
        "{}--{}-{account_name}.{ext}",
        range.start.format("%Y-%m-%d"),
        range.end.format("%Y-%m-%d"),
    ))
}

pub fn prepare_output(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

/// Copy the input export next to its QIF output. Returns false when an
/// identical copy is already there.
pub fn backup_csv(source: &Path, dest: &Path) -> Result<bool> {
    prepare_output(dest)?;
    if dest.exists() {
        if compute_checksum(source)? == compute_checksum(dest)? {
            tracing::info!("Backup already present: {}", dest.display());
            return Ok(false);
        }
        tracing::warn!("Overwriting backup with different contents: {}", dest.display());
    }
    std::fs::copy(source, dest)?;
    tracing::info!("Backed up {} to {}", source.display(), dest.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_csv(dir: &Path, name: &str, rows: &[(&str, &str, &str)]) -> PathBuf {
        let path = dir.join(name);
        let mut content = String::from("Date,Description,Amount\n");
        for (date, desc, amt) in rows {
            content.push_str(&format!("{date},{desc},{amt}\n"));
        }
        std::fs::write(&path, &content).unwrap();
        path
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_mdy() {
        assert_eq!(parse_date_mdy("01/15/2025").unwrap(), date(2025, 1, 15));
        assert!(matches!(parse_date_mdy("2025-01-15"), Err(QifcatError::InvalidDate(_))));
        assert!(parse_date_mdy("02/30/2025").is_err());
    }

    #[test]
    fn test_read_sorts_by_date_and_skips_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "stmt.csv", &[
            ("03/02/2024", "THIRD", "-3.00"),
            ("01/15/2024", "FIRST", "-1.00"),
            ("02/01/2024", "SECOND", "-2.00"),
        ]);
        let imported = read_transactions(&path, 0).unwrap();
        let payees: Vec<&str> = imported.rows.iter().map(|r| &r[1]).collect();
        assert_eq!(payees, vec!["FIRST", "SECOND", "THIRD"]);
        assert_eq!(imported.range, DateRange { start: date(2024, 1, 15), end: date(2024, 3, 2) });
    }

    #[test]
    fn test_read_keeps_same_day_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "stmt.csv", &[
            ("01/15/2024", "B", "-1.00"),
            ("01/15/2024", "A", "-2.00"),
        ]);
        let imported = read_transactions(&path, 0).unwrap();
        assert_eq!(&imported.rows[0][1], "B");
        assert_eq!(&imported.rows[1][1], "A");
    }

    #[test]
    fn test_read_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "empty.csv", &[]);
        assert!(matches!(read_transactions(&path, 0), Err(QifcatError::EmptyInput(_))));
    }

    #[test]
    fn test_read_bad_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "bad.csv", &[("2024-01-15", "X", "1.00")]);
        assert!(matches!(read_transactions(&path, 0), Err(QifcatError::InvalidDate(_))));
    }

    #[test]
    fn test_output_path() {
        let range = DateRange { start: date(2023, 10, 11), end: date(2023, 10, 13) };
        let path = output_path(Path::new("out"), 2024, "checking-personal", &range, "qif");
        assert_eq!(
            path,
            PathBuf::from("out/2024/checking-personal/2023-10-11--2023-10-13-checking-personal.qif")
        );
    }

    #[test]
    fn test_backup_skips_identical_copy() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_csv(dir.path(), "stmt.csv", &[("01/15/2024", "A", "-1.00")]);
        let dest = dir.path().join("2024").join("acct").join("backup.csv");
        assert!(backup_csv(&src, &dest).unwrap());
        assert!(!backup_csv(&src, &dest).unwrap());
        assert_eq!(std::fs::read(&src).unwrap(), std::fs::read(&dest).unwrap());
    }

    #[test]
    fn test_backup_overwrites_changed_copy() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_csv(dir.path(), "stmt.csv", &[("01/15/2024", "A", "-1.00")]);
        let dest = dir.path().join("backup.csv");
        std::fs::write(&dest, "stale").unwrap();
        assert!(backup_csv(&src, &dest).unwrap());
        assert_eq!(std::fs::read(&src).unwrap(), std::fs::read(&dest).unwrap());
    }
}
