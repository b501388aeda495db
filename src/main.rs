//! wellshelf CLI: browse the wellness book catalog and manage saved books.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use wellshelf::catalog::model::EXCERPT_CHARS;
use wellshelf::catalog::{CatalogItem, MemoryBackend, QueryFields};
use wellshelf::config::ShelfConfig;
use wellshelf::error::ShelfError;
use wellshelf::shelf::Bookshelf;

#[derive(Parser)]
#[command(name = "wellshelf", version, about = "Wellness book search and saved collection")]
struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/wellshelf/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Book service base URL, overriding the config file.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Items per page, overriding the config file.
    #[arg(long, global = true)]
    page_size: Option<u32>,

    /// Use the bundled practice books instead of the remote service.
    #[arg(long, global = true)]
    offline: bool,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog. With no query or fields, shows popular books.
    Search {
        /// Free-text query.
        query: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Subject facet (see `wellshelf subjects`).
        #[arg(long)]
        subject: Option<String>,

        /// One-based page to show.
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Show the default popular listing.
    Popular {
        /// One-based page to show.
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// List subject facets.
    Subjects,

    /// List the bundled practice books.
    Practice,

    /// List saved books.
    Saved,

    /// Save a book to the collection.
    Save {
        /// Practice book id, e.g. practice-sample-1.
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        id: Option<String>,

        /// JSON file holding a single book object.
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Remove a book from the collection.
    Remove {
        /// Book identifier.
        id: String,
    },

    /// Inspect or create the config file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// A book as printed with `--json`, saved state included.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookRow<'a> {
    #[serde(flatten)]
    item: &'a CatalogItem,
    is_saved: bool,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => ShelfConfig::default_path()?,
    };
    let overrides = Overrides {
        base_url: cli.base_url,
        page_size: cli.page_size,
    };

    match cli.command {
        Commands::Config { action } => run_config(&action, &config_path, &overrides),
        command => {
            let config = overrides.apply(ShelfConfig::load(&config_path)?);
            let shelf = if cli.offline {
                Bookshelf::with_backend(Arc::new(MemoryBackend::practice()), &config)
            } else {
                Bookshelf::open(&config)
            };
            run_command(command, shelf, cli.json)
        }
    }
}

/// Config values given on the command line.
struct Overrides {
    base_url: Option<String>,
    page_size: Option<u32>,
}

impl Overrides {
    fn apply(&self, mut config: ShelfConfig) -> ShelfConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        config.normalized()
    }
}

fn run_command(command: Commands, mut shelf: Bookshelf, json: bool) -> Result<()> {
    match command {
        Commands::Search {
            query,
            title,
            author,
            description,
            subject,
            page,
        } => {
            report(shelf.refresh());
            let fields = QueryFields {
                free_text: query,
                title,
                author,
                description,
                subject,
            };
            shelf.browse(fields);
            walk_to_page(&mut shelf, page);
            report(shelf.page_notice());
            print_page(&shelf, json)?;
        }

        Commands::Popular { page } => {
            report(shelf.refresh());
            shelf.browse(QueryFields::default());
            walk_to_page(&mut shelf, page);
            report(shelf.page_notice());
            print_page(&shelf, json)?;
        }

        Commands::Subjects => {
            report(shelf.refresh());
            if json {
                println!("{}", serde_json::to_string_pretty(shelf.subjects()).into_diagnostic()?);
            } else {
                for subject in shelf.subjects() {
                    println!("{subject}");
                }
            }
        }

        Commands::Practice => {
            report(shelf.refresh());
            print_books(&shelf.practice_items(), json)?;
        }

        Commands::Saved => {
            report(shelf.refresh());
            let saved = shelf.saved_items();
            if saved.is_empty() && !json {
                println!("No saved books yet.");
            } else {
                print_books(&saved, json)?;
            }
        }

        Commands::Save { id, file } => {
            let stored = match (id, file) {
                (Some(id), _) => shelf.save_practice(&id)?,
                (None, Some(file)) => shelf.save(&read_item(&file)?)?,
                (None, None) => miette::bail!("give a practice book id or --file"),
            };
            println!("Saved \"{}\" ({})", stored.title, stored.id);
        }

        Commands::Remove { id } => {
            shelf.remove(&id)?;
            println!("Removed {id}");
        }

        Commands::Config { action } => {
            miette::bail!("config {action:?} does not use the book service");
        }
    }

    Ok(())
}

fn run_config(action: &ConfigAction, path: &std::path::Path, overrides: &Overrides) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = overrides.apply(ShelfConfig::load(path)?);
            println!("# {}", path.display());
            print!("{}", toml::to_string_pretty(&config).into_diagnostic()?);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                miette::bail!(
                    "config file already exists: {} (pass --force to overwrite it)",
                    path.display()
                );
            }
            ShelfConfig::default().save(path)?;
            println!("Wrote default config to {}", path.display());
        }
    }
    Ok(())
}

/// Step forward page by page; the page count is only known one page ahead.
fn walk_to_page(shelf: &mut Bookshelf, target: u32) {
    let mut page = shelf.session().current_page();
    while page < target {
        page += 1;
        if !shelf.go_to_page(page) {
            tracing::warn!(requested = target, last = page - 1, "no further pages");
            break;
        }
    }
}

fn read_item(path: &std::path::Path) -> Result<CatalogItem> {
    let content = std::fs::read_to_string(path).into_diagnostic()?;
    let item: CatalogItem =
        serde_json::from_str(&content).map_err(|e| ShelfError::InvalidItem {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(item)
}

fn report<I: IntoIterator<Item = ShelfError>>(notices: I) {
    for notice in notices {
        eprintln!("{:?}", miette::Report::new(notice));
    }
}

fn print_page(shelf: &Bookshelf, json: bool) -> Result<()> {
    let results = shelf.results();
    print_books(&results, json)?;
    if json {
        return Ok(());
    }

    let session = shelf.session();
    if results.is_empty() {
        println!("No books found.");
        return Ok(());
    }
    let pages: Vec<String> = session
        .visible_pages()
        .iter()
        .map(|p| {
            if *p == session.current_page() {
                format!("[{p}]")
            } else {
                p.to_string()
            }
        })
        .collect();
    println!(
        "\npage {} of {}{}: {}",
        session.current_page(),
        session.total_pages(),
        if session.has_more() { "+" } else { "" },
        pages.join(" ")
    );
    Ok(())
}

fn print_books(items: &[CatalogItem], json: bool) -> Result<()> {
    if json {
        let rows: Vec<BookRow<'_>> = items
            .iter()
            .map(|item| BookRow {
                item,
                is_saved: item.is_saved,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?);
        return Ok(());
    }

    for item in items {
        let marker = if item.is_saved { "*" } else { " " };
        let origin = if item.is_practice() { "  (practice)" } else { "" };
        println!("{marker} {}  {}{origin}", item.id, item.title);
        println!("    by {}  {}", item.author_line(), item.star_rating());
        let excerpt = item.description_excerpt(EXCERPT_CHARS);
        if !excerpt.is_empty() {
            println!("    {excerpt}");
        }
    }
    Ok(())
}
