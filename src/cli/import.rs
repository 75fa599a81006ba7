use std::fs::File;
use std::io::BufWriter;

use chrono::Datelike;
use colored::Colorize;

use crate::categorizer::{categorize_document, CategorizeResult};
use crate::cli::review::TerminalOperator;
use crate::cli::Cli;
use crate::db::{CategorySource, GnuCashBook};
use crate::error::Result;
use crate::importer::{backup_csv, output_path, prepare_output, read_transactions};
use crate::lookup::LookupStore;
use crate::qif::QifDocument;
use crate::reviewer::Operator;
use crate::settings::{load_account_config, shellexpand_path};

pub fn run(cli: &Cli) -> Result<()> {
    let db_path = shellexpand_path(&cli.database_file);
    let result = process(
        cli,
        || GnuCashBook::open(&db_path)?.category_names(),
        &mut TerminalOperator::new(),
    )?;
    println!(
        "{} matched, {} categorized by hand, {} left as uncategorized, {} new rules",
        result.matched, result.reviewed, result.uncategorized, result.rules_added
    );
    Ok(())
}

/// Convert one bank export to a categorized QIF file next to a backup of the
/// export. `load_categories` is only called once the backup is written.
pub fn process(
    cli: &Cli,
    load_categories: impl FnOnce() -> Result<Vec<String>>,
    operator: &mut dyn Operator,
) -> Result<CategorizeResult> {
    let input = shellexpand_path(&cli.input_csv_file);
    let account_cfg = load_account_config(&shellexpand_path(&cli.account_config), &cli.account_name)?;
    let imported = read_transactions(&input, account_cfg.colspec.date)?;

    let root = shellexpand_path(&cli.output_dir);
    let year = chrono::Local::now().year();
    let backup = output_path(&root, year, &cli.account_name, &imported.range, "csv");
    backup_csv(&input, &backup)?;

    let categories = load_categories()?;
    let mut store = LookupStore::open(&shellexpand_path(&cli.lookup_file), &categories)?;
    let mut doc = QifDocument::from_rows(&imported.rows, &account_cfg)?;
    let result = categorize_document(&mut doc, &mut store, &categories, operator)?;

    let qif_path = output_path(&root, year, &cli.account_name, &imported.range, "qif");
    prepare_output(&qif_path)?;
    let mut out = BufWriter::new(File::create(&qif_path)?);
    doc.write(&mut out)?;
    tracing::info!("Categorized transactions saved to: {}", qif_path.display());
    println!("{}", format!("Saved {}", qif_path.display()).green());
    Ok(result)
}
