//! Contentful cleanup CLI binary.
//!
//! Audits the assets of a Contentful space and reports which ones are
//! no longer linked from any entry.

use clap::Parser;
use contentful_cleanup::cli::{Cli, Command};
use contentful_cleanup::commands::{self, Contentful, DetailsOptions, OrphanOptions};
use contentful_cleanup::output::orphan_summary;
use contentful_cleanup::{Config, ProgressMode};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let progress = if cli.quiet {
        ProgressMode::Hidden
    } else {
        ProgressMode::Console
    };

    let contentful = match Config::from_env().and_then(|c| Contentful::new(c, progress)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Check the CONTENTFUL_* environment variables");
            return ExitCode::FAILURE;
        }
    };

    match run(&contentful, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(contentful: &Contentful, command: Command) -> contentful_cleanup::Result<()> {
    match command {
        Command::GetAssets { output_file } => {
            let assets = commands::get_assets(contentful, &output_file).await?;
            println!("Found {} items", assets.len());
            println!("Wrote assets to {}", output_file.display());
        }
        Command::GetAssetDetails {
            output_file,
            input_file,
            max,
            author,
        } => {
            let options = DetailsOptions {
                output_file,
                input_file,
                max,
                author,
            };
            let table = commands::get_asset_details(contentful, &options).await?;
            println!(
                "Wrote {} rows to {}",
                table.len(),
                options.output_file.display()
            );
        }
        Command::FindOrphanedAssets {
            output_file,
            input_file,
            max,
        } => {
            let options = OrphanOptions {
                output_file,
                input_file,
                max,
            };
            let orphans = commands::find_orphaned_assets(contentful, &options).await?;
            println!("{}", orphan_summary(&orphans, &contentful.config.locale));
            println!(
                "Wrote {} rows to {}",
                orphans.len(),
                options.output_file.display()
            );
        }
    }
    Ok(())
}
