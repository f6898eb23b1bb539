use agro_reports::config::cli::AnalyzeCli;
use agro_reports::utils::logger;
use agro_reports::{AnalyzePipeline, EtlEngine, LocalStorage};
use clap::Parser;

#[tokio::main]
async fn main() {
    let args = AnalyzeCli::parse();
    logger::init_cli_logger(args.verbose);

    tracing::info!("📊 Analyzing workbook: {}", args.workbook);
    if args.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = AnalyzePipeline::new(LocalStorage::new(""), &args.workbook, args.output);
    let engine = EtlEngine::new_with_monitoring(pipeline, args.monitor);

    match engine.run().await {
        Ok(run) => {
            println!("✅ Analysis saved to: {}", run.output_path);
            println!("💡 Open the JSON file for the full per-sheet details.");
            if args.monitor {
                print!("{}", run.stats.render_text());
            }
        }
        Err(e) => {
            e.report("Workbook analysis");
            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
