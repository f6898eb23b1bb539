use agro_reports::config::cli::InspectCli;
use agro_reports::core::inspect;
use agro_reports::domain::ports::SheetSource;
use agro_reports::utils::logger;
use agro_reports::{LocalStorage, XlsxWorkbook};
use anyhow::Context;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = InspectCli::parse();
    logger::init_cli_logger(args.verbose);

    let mut workbook = XlsxWorkbook::open(&args.workbook)
        .with_context(|| format!("could not open workbook '{}'", args.workbook))?;

    println!("📊 Workbook: {}", workbook.file_name());
    println!("📑 Sheets:");
    for (i, name) in workbook.sheet_names().iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }
    println!();

    let sheets = inspect::read_sheets(&mut workbook, args.sheet.as_deref())?;
    for sheet in &sheets {
        let summary = inspect::summarize(sheet, args.header_row, args.rows);
        println!("{}", summary.render_text());
    }

    if let Some(dir) = &args.csv_dir {
        let storage = LocalStorage::new(dir.clone());
        let written = inspect::export_csv(&storage, &sheets, args.header_row)
            .await
            .with_context(|| format!("could not write CSV files to '{}'", dir))?;
        println!("✅ {} CSV files written to {}", written.len(), dir);
    }

    Ok(())
}
