use clap::{Parser, Subcommand};
use simple_capsule::generate::{self, BuildPaths};
use simple_capsule::{config, output, scan};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn version_string() -> &'static str {
    let on_tag = env!("CAPSULE_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("CAPSULE_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "simple-capsule")]
#[command(about = "Gemini capsule generator for plain text and markdown")]
#[command(long_about = "\
Gemini capsule generator for plain text and markdown

Your filesystem is the data source. Top-level text files become pages,
directories become collections, and subdirectories become sections.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── index.txt                    # Landing page (empty = no page emitted)
  ├── links.txt                    # Page → pages/links.gmi
  ├── cartas/                      # Collection with sections
  │   ├── sections.json            # Section names and order (optional)
  │   ├── 01_inicio/
  │   │   └── primeira_carta.md    # Document → .../01_inicio/primeira_carta.gmi
  │   └── 02_viagem/
  │       └── terceira_carta.md
  └── receitas/                    # Flat collection (single 'main' section)
      └── bolo_de_milho.md

Documents in a collection are chained with previous / up / next links
across section boundaries. Every page ends with the attribution footer.

Run 'simple-capsule gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "capsule", global = true)]
    output: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the content directory and generate the capsule
    Build,
    /// Print the scan manifest as JSON
    Scan,
    /// Validate the content directory without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    match cli.command {
        Command::Build => {
            let paths = BuildPaths {
                source_root: cli.source.clone(),
                output_root: cli.output.clone(),
            };
            println!(
                "==> Building {} → {}",
                paths.source_root.display(),
                paths.output_root.display()
            );
            let (_, report) = generate::build(&paths)?;
            output::print_build_report(&report);
            println!("==> Build complete: {}", paths.output_root.display());
        }
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so `scan` output stays parseable. `RUST_LOG` wins over `-v`.
fn setup_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbosity {
        0 => EnvFilter::new("simple_capsule=warn"),
        1 => EnvFilter::new("simple_capsule=info"),
        _ => EnvFilter::new("simple_capsule=debug"),
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
