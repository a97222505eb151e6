use clap::{Parser, Subcommand, ValueEnum};
use cosmetics_ner::Result;
use cosmetics_ner::annotation::{ValidationReport, validate_jsonl_file};
use cosmetics_ner::gazetteer;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cosmetics-ner")]
#[command(about = "Annotation tooling for cosmetics NER", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,

    /// Enable verbose output (use -vv for debug output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSONL annotation file (exits non-zero if any record fails).
    Validate {
        /// JSONL file, one {"text", "entities"} record per line.
        input: String,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Generate gazetteers from a SKU catalog CSV.
    Gazetteers {
        #[arg(long)]
        catalog: String,

        #[arg(short = 'o', long, default_value = "ner_training/gazetteers")]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Commands::Validate { input, format } => {
            let report = validate_jsonl_file(&input)?;
            match format {
                Format::Text => print_report(&input, &report),
                Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
            if !report.is_clean() {
                anyhow::bail!(
                    "{} of {} records in {} failed validation",
                    report.issues.len(),
                    report.records,
                    input
                );
            }
        }
        Commands::Gazetteers { catalog, out } => {
            let counts = gazetteer::build_gazetteers(&catalog, &out)?;
            println!("Gazetteers written to: {}", out.display());
            println!("Counts:");
            for (file, n) in counts.0 {
                println!("  {:<20} : {}", file, n);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default = match verbose {
        0 => "cosmetics_ner=warn",
        1 => "cosmetics_ner=info",
        _ => "cosmetics_ner=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn print_report(path: &str, report: &ValidationReport) {
    for issue in &report.issues {
        println!("{}:{}: {}: {}", path, issue.line, issue.kind, issue.message);
    }
    for o in &report.overlaps {
        println!(
            "{}:{}: note: spans {} and {} overlap",
            path, o.line, o.first, o.second
        );
    }

    let labels: Vec<String> = report
        .label_counts
        .iter()
        .map(|(label, n)| format!("{}={}", label, n))
        .collect();
    println!(
        "{} records, {} valid, {} invalid [{}]",
        report.records,
        report.valid,
        report.issues.len(),
        labels.join(" ")
    );
}
