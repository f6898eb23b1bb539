use agro_reports::config::cli::ReportCli;
use agro_reports::core::report_pipeline::OrganizationRef;
use agro_reports::utils::{logger, validation::Validate};
use agro_reports::{
    AgroConfig, EtlEngine, HttpReportSource, LocalStorage, ReportPipeline, ReportSettings,
};
use clap::error::ErrorKind;
use clap::Parser;

const USAGE: &str = "Usage: agro-report <organization_id_or_name> [output_path]";

#[tokio::main]
async fn main() {
    let cli = match ReportCli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            eprintln!("{}", USAGE);
            eprintln!("Example with id:   agro-report 41ee5785-2d48-4f68-a307-d4636d114ab1");
            eprintln!("Example with name: agro-report 'WILSEMAR ELGER' report.pdf");
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(cli.verbose);
    tracing::info!("🚀 Starting agro-report");
    tracing::debug!("CLI arguments: {:?}", cli);

    let config = match AgroConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            e.report("Loading configuration");
            std::process::exit(1);
        }
    };

    let settings = ReportSettings::from_config(&config).with_cli(&cli);
    if let Err(e) = settings.validate() {
        e.report("Configuration validation");
        std::process::exit(1);
    }

    if settings.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let organization = OrganizationRef::parse(&cli.organization);
    let source = HttpReportSource::from_config(&settings);
    let storage = LocalStorage::new("");
    let monitor = settings.monitor;
    let pipeline = ReportPipeline::new(source, storage, settings, organization, cli.output);

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor);
    match engine.run().await {
        Ok(run) => {
            tracing::info!("✅ Report generated successfully!");
            println!("✅ Report generated successfully!");
            println!("📁 Output saved to: {}", run.output_path);
            if monitor {
                print!("{}", run.stats.render_text());
            }
        }
        Err(e) => {
            e.report("Report generation");
            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
