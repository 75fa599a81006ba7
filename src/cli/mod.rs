pub mod import;
pub mod review;

use clap::Parser;

use crate::settings::{DEFAULT_ACCOUNT_CONFIG, DEFAULT_DATABASE_FILE, DEFAULT_LOOKUP_FILE};

#[derive(Parser, Debug)]
#[command(
    name = "qifcat",
    version,
    about = "Process and categorize financial transactions to QIF files."
)]
pub struct Cli {
    /// Path to the input CSV file
    pub input_csv_file: String,

    /// Short name of the account for these transactions
    #[arg(short = 'a', long = "account-name")]
    pub account_name: String,

    /// Path to the account config JSON file
    #[arg(short = 'c', long = "account-config", default_value = DEFAULT_ACCOUNT_CONFIG)]
    pub account_config: String,

    /// Path to the lookup JSON file
    #[arg(short = 'l', long = "lookup-file", default_value = DEFAULT_LOOKUP_FILE)]
    pub lookup_file: String,

    /// Path to the categories GnuCash DB file
    #[arg(short = 'd', long = "database-file", default_value = DEFAULT_DATABASE_FILE)]
    pub database_file: String,

    /// Directory under which `<year>/<account>/` outputs are written
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: String,

    /// Log debug detail
    #[arg(long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["qifcat", "stmt.csv", "-a", "checking-personal"]).unwrap();
        assert_eq!(cli.input_csv_file, "stmt.csv");
        assert_eq!(cli.account_name, "checking-personal");
        assert_eq!(cli.account_config, DEFAULT_ACCOUNT_CONFIG);
        assert_eq!(cli.lookup_file, DEFAULT_LOOKUP_FILE);
        assert_eq!(cli.database_file, DEFAULT_DATABASE_FILE);
        assert_eq!(cli.output_dir, ".");
        assert!(!cli.verbose);
    }

    #[test]
    fn test_account_name_required() {
        assert!(Cli::try_parse_from(["qifcat", "stmt.csv"]).is_err());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "qifcat", "stmt.csv", "--account-name", "visa", "-c", "cfg.json", "-l", "lookup.json",
            "-d", "books.gnucash", "-o", "out", "--verbose",
        ])
        .unwrap();
        assert_eq!(cli.account_config, "cfg.json");
        assert_eq!(cli.lookup_file, "lookup.json");
        assert_eq!(cli.database_file, "books.gnucash");
        assert_eq!(cli.output_dir, "out");
        assert!(cli.verbose);
    }
}
