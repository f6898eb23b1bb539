use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "agro-report")]
#[command(about = "Generate the multi-page financial report PDF for an organization")]
pub struct ReportCli {
    /// Organization id (36-char UUID) or display name
    pub organization: String,

    /// Output PDF path (default: <output_dir>/<prefix>_<timestamp>.pdf)
    pub output: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Report API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Projection scenario passed as `projectionId`
    #[arg(long)]
    pub projection_id: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log CPU and memory after each phase
    #[arg(long)]
    pub monitor: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "sheet-inspect")]
#[command(about = "Print the shape, columns and first rows of each sheet in a workbook")]
pub struct InspectCli {
    /// Workbook to inspect (.xlsx)
    pub workbook: String,

    /// Only inspect this sheet
    #[arg(short, long)]
    pub sheet: Option<String>,

    /// 0-based row holding the column names
    #[arg(long, default_value = "0")]
    pub header_row: usize,

    /// Number of sample rows per sheet
    #[arg(short = 'n', long, default_value = "5")]
    pub rows: usize,

    /// Write each inspected sheet as <dir>/<sheet>.csv
    #[arg(long)]
    pub csv_dir: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "plan-analyze")]
#[command(about = "Detect headers, column types and totals of a business-plan workbook")]
pub struct AnalyzeCli {
    /// Business-plan workbook (.xlsx)
    pub workbook: String,

    /// JSON output path (default: analise_<stem>.json next to the workbook)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log CPU and memory after each phase
    #[arg(long)]
    pub monitor: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "plan-extract")]
#[command(about = "Extract production, debt and asset data from a business-plan workbook")]
pub struct ExtractCli {
    /// Business-plan workbook (.xlsx)
    pub workbook: String,

    /// JSON output path (default: dados_extraidos_plano_negocios.json next to the workbook)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Producer name recorded in the metadata
    #[arg(long)]
    pub producer: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log CPU and memory after each phase
    #[arg(long)]
    pub monitor: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "schema-probe")]
#[command(about = "List tables, columns and foreign keys of a PostgreSQL schema")]
pub struct ProbeCli {
    /// Connection string (default: [database].url, then DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Schema to inspect
    #[arg(long)]
    pub schema: Option<String>,

    /// Restrict to these tables (repeatable or comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub table: Vec<String>,

    /// Count rows of every listed table
    #[arg(long)]
    pub count: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
