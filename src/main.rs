use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Result, eyre};
use std::path::PathBuf;

use projstore::{Config, OrderBy, OrderDirection, Project, ProjectFilter, ProjectStore, parse_date_ms};

#[derive(Parser)]
#[command(name = "projstore")]
#[command(about = "Track projects in a local store: add, search, favorite, delete")]
#[command(version)]
struct Cli {
    /// Path to the config file (default: platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory override for the configured backend
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a project
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        client: String,

        /// Start date, YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// End date, YYYY-MM-DD
        #[arg(long)]
        end: String,

        /// Encoded image payload
        #[arg(long)]
        image: Option<String>,

        /// Mark as a favorite right away
        #[arg(long)]
        favorite: bool,
    },

    /// List projects, optionally filtered, ordered or searched by name
    List {
        /// Keep only favorites (true) or non-favorites (false)
        #[arg(long)]
        favorited: Option<bool>,

        /// Sort key: name, startDate or endDate
        #[arg(long)]
        order_by: Option<OrderBy>,

        /// Sort direction: asc or desc
        #[arg(long)]
        direction: Option<OrderDirection>,

        /// Case-insensitive name search; the term is recorded in history
        #[arg(long)]
        name: Option<String>,
    },

    /// Show one project
    Show { id: String },

    /// Change fields of an existing project
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        client: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        image: Option<String>,

        /// Set the favorite flag explicitly (true or false)
        #[arg(long)]
        favorite: Option<bool>,
    },

    /// Toggle a project's favorite flag
    Favorite { id: String },

    /// Delete a project
    Delete { id: String },

    /// Show recent search terms, most recent first
    History,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.store_path {
        config.path = path;
    }
    let mut store = ProjectStore::new(config.provider()?);

    match cli.command {
        Commands::Add {
            name,
            client,
            start,
            end,
            image,
            favorite,
        } => {
            warn_unparseable_date("start", &start);
            warn_unparseable_date("end", &end);

            let mut project = Project::new(name, client, start, end);
            project.image_url = image;
            project.favorited = favorite;
            let id = project.id.clone();
            store.save(project)?;
            println!("Created project {}", id.bold());
        }

        Commands::List {
            favorited,
            order_by,
            direction,
            name,
        } => {
            let filter = ProjectFilter {
                favorited,
                order_by,
                order_direction: direction,
                name,
            };
            let projects = store.list(&filter)?;
            if projects.is_empty() {
                println!("No projects found");
            } else {
                print_project_table(&projects);
            }
        }

        Commands::Show { id } => {
            let project = store
                .get_by_id(&id)?
                .ok_or_else(|| eyre!("No project with id {}", id))?;
            print_project(&project);
        }

        Commands::Edit {
            id,
            name,
            client,
            start,
            end,
            image,
            favorite,
        } => {
            let mut project = store
                .get_by_id(&id)?
                .ok_or_else(|| eyre!("No project with id {}", id))?;

            if let Some(name) = name {
                project.name = name;
            }
            if let Some(client) = client {
                project.client = client;
            }
            if let Some(start) = start {
                warn_unparseable_date("start", &start);
                project.start_date = start;
            }
            if let Some(end) = end {
                warn_unparseable_date("end", &end);
                project.end_date = end;
            }
            if let Some(image) = image {
                project.image_url = Some(image);
            }
            if let Some(favorite) = favorite {
                project.favorited = favorite;
            }

            match store.update(project)? {
                Some(project) => print_project(&project),
                None => return Err(eyre!("No project with id {}", id)),
            }
        }

        Commands::Favorite { id } => {
            let mut project = store
                .get_by_id(&id)?
                .ok_or_else(|| eyre!("No project with id {}", id))?;
            project.favorited = !project.favorited;
            let flagged = project.favorited;
            store.update(project)?;
            if flagged {
                println!("Favorited {}", id);
            } else {
                println!("Unfavorited {}", id);
            }
        }

        Commands::Delete { id } => {
            let remaining = store.delete(&id)?;
            println!("Deleted {} ({} remaining)", id, remaining.len());
        }

        Commands::History => {
            let history = store.search_history()?;
            if history.is_empty() {
                println!("No search history");
            } else {
                for (i, term) in history.iter().enumerate() {
                    println!("{}. {}", i + 1, term);
                }
            }
        }
    }

    Ok(())
}

fn print_project(project: &Project) {
    println!("{} {}", favorite_marker(project), project.name.bold());
    println!("  id:     {}", project.id);
    println!("  client: {}", project.client);
    println!("  dates:  {} to {}", project.start_date, project.end_date);
    if project.image_url.is_some() {
        println!("  image:  attached");
    }
}

fn print_project_table(projects: &[Project]) {
    for project in projects {
        // Pad before coloring so ANSI escapes don't break the columns
        let name = format!("{:<24}", project.name);
        let client = format!("{:<16}", project.client);
        println!(
            "{} {} {} {} to {}  {}",
            favorite_marker(project),
            name.bold(),
            client,
            project.start_date,
            project.end_date,
            project.id.dimmed()
        );
    }
}

fn favorite_marker(project: &Project) -> String {
    if project.favorited {
        "*".yellow().to_string()
    } else {
        " ".to_string()
    }
}

fn warn_unparseable_date(field: &str, value: &str) {
    if parse_date_ms(value).is_none() {
        eprintln!(
            "{} {} date {:?} does not parse as a date; it will sort as absent",
            "warning:".yellow(),
            field,
            value
        );
    }
}
