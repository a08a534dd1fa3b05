//! Command-line front-end for the item catalog.
//!
//! # Responsibility
//! - Drive the core repository from a terminal (add/list/show/search/update/remove).
//! - Double as a quick probe of `whereis_core` linkage and storage setup.
//!
//! Store selection comes from `--store`/`--path`, falling back to the
//! `WHEREIS_*` environment variables read by `CoreConfig::from_env`.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use whereis_core::{
    init_logging, CoreConfig, Item, ItemDraft, ItemId, ItemPatch, Location, PatchField,
    RepoError, StorageBackend,
};

#[derive(Parser, Debug)]
#[command(name = "whereis")]
#[command(about = "Catalog your belongings and find them by name")]
#[command(version)]
struct Cli {
    /// Storage backend: sqlite, file or memory.
    #[arg(long, global = true)]
    store: Option<String>,
    /// Database file (sqlite) or directory (file backend).
    #[arg(long, global = true)]
    path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a new item
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// Photo reference (file path or uri)
        #[arg(long)]
        photo: Option<String>,
        #[command(flatten)]
        location: LocationArgs,
    },
    /// List every item in catalog order
    List,
    /// Show one item
    Show { id: String },
    /// Find items whose name contains QUERY (case-insensitive)
    Search { query: String },
    /// Change fields of an existing item
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "clear_photo")]
        photo: Option<String>,
        #[arg(long)]
        clear_photo: bool,
        #[command(flatten)]
        location: LocationArgs,
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        clear_location: bool,
    },
    /// Delete an item
    Remove {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct LocationArgs {
    /// Latitude in degrees
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Longitude in degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,
}

impl LocationArgs {
    fn location(&self) -> Option<Location> {
        match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => Some(Location::new(latitude, longitude)),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = CoreConfig::from_env().context("reading WHEREIS_* environment")?;
    if cli.store.is_some() || cli.path.is_some() {
        let name = cli.store.as_deref().unwrap_or(config.storage.label());
        config.storage = StorageBackend::parse(name, cli.path.clone())?;
    }
    config.validate()?;

    if let Some(dir) = config.log_dir.as_ref() {
        let dir = dir.to_str().context("log directory must be valid UTF-8")?;
        init_logging(&config.log_level, dir)
            .map_err(|err| anyhow::anyhow!("starting logging: {err}"))?;
    }

    let repo = config
        .open_repository()
        .with_context(|| format!("opening {} store", config.storage.label()))?;

    match cli.command {
        Command::Add {
            name,
            description,
            photo,
            location,
        } => {
            let draft = ItemDraft {
                name,
                description,
                photo_uri: photo,
                location: location.location(),
            };
            let item = repo.create(draft).await.map_err(explain)?;
            println!("{}", item.id);
        }
        Command::List => print_items(&repo.list().await),
        Command::Show { id } => {
            let item = repo.get(&ItemId::from(id)).await.map_err(explain)?;
            print_detail(&item);
        }
        Command::Search { query } => print_items(&repo.search(&query).await),
        Command::Update {
            id,
            name,
            description,
            photo,
            clear_photo,
            location,
            clear_location,
        } => {
            let patch = ItemPatch {
                name,
                description,
                photo_uri: if clear_photo {
                    PatchField::Clear
                } else {
                    photo.map_or(PatchField::Keep, PatchField::Set)
                },
                location: if clear_location {
                    PatchField::Clear
                } else {
                    location.location().map_or(PatchField::Keep, PatchField::Set)
                },
            };
            if patch.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            let item = repo
                .update(&ItemId::from(id), patch)
                .await
                .map_err(explain)?;
            print_detail(&item);
        }
        Command::Remove { id, yes } => {
            let id = ItemId::from(id);
            let item = repo.get(&id).await.map_err(explain)?;
            if !yes && !confirm(&format!("Delete \"{}\"?", item.name))? {
                println!("Cancelled.");
                return Ok(());
            }
            repo.remove(&id).await.map_err(explain)?;
            println!("Deleted {id}.");
        }
    }

    Ok(())
}

fn explain(err: RepoError) -> anyhow::Error {
    match err {
        RepoError::Validation(_) => anyhow::anyhow!("{err}: name and description are required"),
        RepoError::NotFound(_) => anyhow::anyhow!("{err}; run `whereis list` to refresh"),
        other => anyhow::Error::new(other).context("catalog was not changed"),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush().context("flushing prompt")?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("reading confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_items(items: &[Item]) {
    if items.is_empty() {
        println!("No items.");
        return;
    }
    for item in items {
        let marker = if item.has_photo() { " [photo]" } else { "" };
        println!("{}  {}{}", item.id, item.name, marker);
    }
}

fn print_detail(item: &Item) {
    println!("id:          {}", item.id);
    println!("name:        {}", item.name);
    println!("description: {}", item.description);
    match item.photo_uri.as_deref() {
        Some(uri) => println!("photo:       {uri}"),
        None => println!("photo:       none"),
    }
    match item.location {
        Some(loc) => println!("location:    {:.6}, {:.6}", loc.latitude, loc.longitude),
        None => println!("location:    none"),
    }
}
