use clap::{Parser, Subcommand};
use folio::{catalog, config, content, logging, output, page, site};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static generator for a personal portfolio: photos, blog, quotes")]
#[command(long_about = "\
Static generator for a personal portfolio: photos, blog, quotes

Site structure (paths configurable in config.toml):

  site/
  ├── config.toml                  # Site config (optional)
  ├── about.md                     # Home page about section (optional)
  ├── data/
  │   ├── photos.json              # [{file, title, category, description?}]
  │   └── quotes.json              # [{text, author, source}]
  ├── blog/
  │   ├── posts.json               # [{id, title, date, excerpt, tags, file}]
  │   └── posts/hello-world.md     # Post bodies, markdown
  ├── images/                      # Photo files → /images/
  └── assets/                      # Copied to the output root

Every filter selection, every open lightbox photo and every post becomes
its own static page.

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site source directory
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log debug diagnostics to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the static site
    Build,
    /// Validate data files without building
    Check,
    /// Render the content area of one post page to stdout
    Post {
        /// Post id; omit to see the missing-id page
        #[arg(long)]
        id: Option<String>,
    },
    /// Sync photos.json with the images directory
    Catalog {
        /// Print the resulting JSON instead of writing it
        #[arg(long)]
        dry_run: bool,
        /// Category for newly found images
        #[arg(long, default_value = catalog::DEFAULT_CATEGORY)]
        category: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;
            println!(
                "==> Building {} → {}",
                cli.source.display(),
                cli.output.display()
            );
            let report = site::build(&cli.source, &cli.output, &site_config)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let site_config = config::load_config(&cli.source)?;
            println!("==> Checking {}", cli.source.display());
            let report = site::check(&cli.source, &site_config);
            output::print_check_output(&report);
        }
        Command::Post { id } => {
            let site_config = config::load_config(&cli.source)?;
            let source = content::DirSource::new(&cli.source);
            let post = page::PostPage::load(
                &source,
                &site_config.paths,
                id.as_deref(),
                &site_config.site.author,
            );
            println!("{}", post.fragment().into_string());
        }
        Command::Catalog { dry_run, category } => {
            let site_config = config::load_config(&cli.source)?;
            let result = catalog::catalog(&cli.source, &site_config, &category, dry_run)?;
            if dry_run {
                // stdout carries the JSON only
                for line in output::format_catalog_output(&result, dry_run) {
                    eprintln!("{}", line);
                }
                print!("{}", catalog::to_json(&result.photos)?);
            } else {
                output::print_catalog_output(&result, dry_run);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
