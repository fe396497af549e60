use clap::Parser;

/// This is a tracking program for construction submittals and RFIs.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the project: input files, thresholds, filters
    /// and extra organizations. See the manual of tracker_core for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) The submittal export to read. Overrides the configuration file.
    /// If no file is given, a built-in sample is used.
    #[clap(short, long, value_parser)]
    pub submittals: Option<String>,

    /// (file path, optional) The RFI export to read. Overrides the configuration file.
    /// If no file is given, a built-in sample is used.
    #[clap(long, value_parser)]
    pub rfis: Option<String>,

    /// (csv, excel or pdf) The type of the input files. Guessed from the file extension if not specified.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default 14) Open submittals older than this number of days are overdue.
    #[clap(long, value_parser)]
    pub submittal_threshold: Option<i64>,

    /// (default 10) Open RFIs older than this number of days are overdue.
    #[clap(long, value_parser)]
    pub rfi_threshold: Option<i64>,

    /// (YYYY-MM-DD, default today) The date at which the ages and the due dates are evaluated.
    #[clap(long, value_parser)]
    pub report_date: Option<String>,

    /// Only keep the items of this contractor. Can be repeated.
    #[clap(long = "contractor", value_parser)]
    pub contractors: Vec<String>,

    /// Only keep the RFIs of this discipline. Can be repeated.
    #[clap(long = "discipline", value_parser)]
    pub disciplines: Vec<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (directory, optional) If specified, the overdue report and the filtered tables are written there
    /// as CSV files. Overrides the output directory of the configuration file.
    #[clap(long, value_parser)]
    pub export_dir: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, subtrack will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
