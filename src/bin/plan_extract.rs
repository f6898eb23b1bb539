use agro_reports::config::cli::ExtractCli;
use agro_reports::utils::logger;
use agro_reports::{EtlEngine, ExtractPipeline, LocalStorage};
use clap::Parser;

#[tokio::main]
async fn main() {
    let args = ExtractCli::parse();
    logger::init_cli_logger(args.verbose);

    tracing::info!("📊 Extracting business-plan data from: {}", args.workbook);

    let pipeline = ExtractPipeline::new(
        LocalStorage::new(""),
        &args.workbook,
        args.output,
        args.producer,
    );
    let engine = EtlEngine::new_with_monitoring(pipeline, args.monitor);

    match engine.run().await {
        Ok(run) => {
            println!("✅ Extracted data saved to: {}", run.output_path);
            if args.monitor {
                print!("{}", run.stats.render_text());
            }
        }
        Err(e) => {
            e.report("Business-plan extraction");
            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
