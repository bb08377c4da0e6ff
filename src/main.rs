use clap::Parser;
use tailwind_template_scanner::{logging, run_scan, run_watch, Cli, ScannerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level)?;

    let config = match ScannerConfig::from_args(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    if cli.watch {
        // Runs until interrupted; per-cycle failures are logged, not fatal.
        if let Err(e) = run_watch(config).await {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        Ok(())
    } else {
        match run_scan(&config) {
            Ok(summary) => {
                println!("Scan successful!");
                println!("  - Scanned {} files", summary.files_scanned);
                if summary.wrote_artifact {
                    println!(
                        "  - Generated {} with {} unique classes",
                        summary.output.display(),
                        summary.classes_found
                    );
                } else {
                    println!(
                        "  - Found {} unique classes (dry run, artifact not written)",
                        summary.classes_found
                    );
                }
                Ok(())
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
