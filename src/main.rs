use clap::{Parser, Subcommand};
use comic_shelf::{archive, catalog, config, output, scan};
use std::io::Write;
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "comic-shelf")]
#[command(about = "Catalog a comic library and extract pages from CBZ archives")]
#[command(long_about = "\
Catalog a comic library and extract pages from CBZ archives

Your filesystem is the data source. A library is a directory tree of
.cbz files; folders are series, and volume numbers are inferred from
filenames.

Library structure:

  comics/
  ├── config.toml                  # Scan settings (optional)
  ├── catalog.json                 # Written by 'scan'
  ├── One Piece/                   # Series folder
  │   ├── One Piece Vol. 1.cbz
  │   └── One Piece Vol. 2.cbz
  ├── Shonen/
  │   └── Akira/                   # Nesting OK; series = parent folder
  │       └── Akira Tomo 3.cbz
  └── oneshot.cbz                  # Root-level → \"No Series\"

Volume inference (first match wins):
  Explicit marker:  \"Vol. 12\", \"volume 3\", \"tomo-5\"
  Bare number:      \"#4\", \"Berserk 07\"
  Chapter marker:   \"cap 3\"
  Nothing usable:   volume 9999, sorted last within its series

Run 'comic-shelf gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Library root directory
    #[arg(long, default_value = "comics", global = true)]
    library: PathBuf,

    /// Catalog file (relative paths resolve against the library root)
    #[arg(long, default_value = catalog::CATALOG_FILENAME, global = true)]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the library and add newly found archives to the catalog
    Scan,
    /// List the catalog, sorted by series and volume
    List,
    /// List the page entries of one archive
    Pages {
        /// Path to a .cbz archive
        archive: PathBuf,
    },
    /// Extract a single page's bytes to a file or stdout
    Extract {
        /// Path to a .cbz archive
        archive: PathBuf,
        /// Zero-based page index into the archive's sorted page list
        index: usize,
        /// Write the page here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Verify every archive in the library, reporting broken ones
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let catalog_path = resolve_catalog_path(&cli);

    match cli.command {
        Command::Scan => {
            let config = config::load_config(&cli.library)?;
            let options = scan::ScanOptions::from_config(&config.scan);
            let mut catalog = catalog::Catalog::load(&catalog_path)?;

            let report = scan::scan(&cli.library, &catalog.filenames(), &options);
            catalog.insert_batch(report.records.clone());
            catalog.save(&catalog_path)?;

            output::print_scan_output(&report);
        }
        Command::List => {
            let catalog = catalog::Catalog::load(&catalog_path)?;
            output::print_catalog_output(&catalog);
        }
        Command::Pages { archive } => {
            let pages = archive::list_pages(&archive)?;
            output::print_pages_output(&archive, &pages);
        }
        Command::Extract {
            archive: container,
            index,
            out,
        } => {
            // Index bounds are the caller's check, distinct from the
            // extraction failures inside the archive itself.
            let pages = archive::list_pages(&container)?;
            let page = pages.get(index).ok_or_else(|| {
                format!(
                    "page index {index} out of range (archive has {} pages)",
                    pages.len()
                )
            })?;

            let bytes = archive::extract_page(&container, page)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, &bytes)?;
                    println!("{page} → {} ({} bytes)", path.display(), bytes.len());
                }
                None => std::io::stdout().write_all(&bytes)?,
            }
        }
        Command::Check => {
            let config = config::load_config(&cli.library)?;
            let options = scan::ScanOptions::from_config(&config.scan);

            let (found, failures) = scan::discover(&cli.library, &options);
            for failure in &failures {
                eprintln!("warning: {}: {}", failure.path.display(), failure.message);
            }

            // Best-effort sweep: every failure kind collapses into one
            // "unavailable" outcome carrying its diagnostic.
            let outcomes: Vec<output::CheckOutcome> = found
                .iter()
                .map(|discovered| output::CheckOutcome {
                    key: discovered.key.clone(),
                    problem: archive::verify_archive(&discovered.path)
                        .err()
                        .map(|e| e.to_string()),
                })
                .collect();

            output::print_check_output(&outcomes);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Relative catalog paths live inside the library; absolute paths are
/// taken as given.
fn resolve_catalog_path(cli: &Cli) -> PathBuf {
    if cli.catalog.is_absolute() {
        cli.catalog.clone()
    } else {
        cli.library.join(&cli.catalog)
    }
}
