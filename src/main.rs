use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use vidcat::catalog::{CatalogStore, VideoRecord};
use vidcat::config::AppPaths;
use vidcat::errors::CatalogError;
use vidcat::pager::{self, PAGE_SIZE, PageControl, PageState};
use vidcat::player;
use vidcat::query::{self, QueryParams, SortKey};

#[derive(Parser)]
#[command(name = "vidcat", version, about = "A local video archive browser")]
struct Cli {
    /// Output results as JSON
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Record file to load (default: ./data/video_data.json, then
    /// ~/.vidcat/video_data.json)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List videos, filtered and paginated
    List {
        /// Page to show (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Filter by category (exact match)
        #[arg(short, long)]
        category: Option<String>,

        /// Filter by tag (exact match)
        #[arg(short, long)]
        tag: Option<String>,

        /// Sort order: date-desc, date-asc, title-asc, title-desc
        #[arg(short, long, default_value = "date-desc")]
        sort: String,
    },

    /// Search titles and descriptions
    Search {
        /// Search query (case-insensitive substring)
        query: String,

        /// Page to show (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Filter by category (exact match)
        #[arg(short, long)]
        category: Option<String>,

        /// Filter by tag (exact match)
        #[arg(short, long)]
        tag: Option<String>,

        /// Sort order: date-desc, date-asc, title-asc, title-desc
        #[arg(short, long, default_value = "date-desc")]
        sort: String,
    },

    /// Show a specific video's metadata
    Get {
        /// Video id
        id: String,
    },

    /// Open a video in the external player
    Open {
        /// Video id
        id: String,

        /// Player program to use instead of the system opener
        #[arg(long)]
        player: Option<String>,
    },

    /// Copy a video's file path to the clipboard
    CopyPath {
        /// Video id
        id: String,
    },

    /// List all categories in the catalog
    Categories,

    /// List all tags in the catalog
    Tags,

    /// Show catalog statistics
    Stats,

    /// Interactive TUI browser
    Tui {
        /// Player program to use instead of the system opener
        #[arg(long)]
        player: Option<String>,
    },
}

#[derive(Serialize)]
struct StatusResponse {
    success: bool,
    message: String,
}

#[derive(Serialize)]
struct PageResponse<'a> {
    page: usize,
    total_pages: usize,
    total_matching: usize,
    videos: &'a [VideoRecord],
}

#[derive(Serialize)]
struct StatsResponse {
    total_videos: usize,
    categories: usize,
    tags: usize,
    oldest_date: Option<String>,
    newest_date: Option<String>,
    used_fallback: bool,
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        if json {
            eprintln!("{}", serde_json::json!({"error": e.to_string()}));
        } else {
            eprintln!("error: {}", e);
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> vidcat::errors::Result<()> {
    let paths = AppPaths::new();
    let data_file = paths.resolve_data_file(cli.data.as_deref());
    let json = cli.json;

    match cli.command {
        None => vidcat::tui::run(CatalogStore::open(&data_file), None),
        Some(Commands::List {
            page,
            category,
            tag,
            sort,
        }) => {
            let params = QueryParams {
                search_term: String::new(),
                category,
                tag,
                sort: parse_sort(&sort)?,
            };
            cmd_page(&data_file, params, page, json)
        }
        Some(Commands::Search {
            query,
            page,
            category,
            tag,
            sort,
        }) => {
            let params = QueryParams {
                search_term: query,
                category,
                tag,
                sort: parse_sort(&sort)?,
            };
            cmd_page(&data_file, params, page, json)
        }
        Some(Commands::Get { id }) => cmd_get(&data_file, &id, json),
        Some(Commands::Open { id, player }) => cmd_open(&data_file, &id, player.as_deref(), json),
        Some(Commands::CopyPath { id }) => cmd_copy_path(&data_file, &id, json),
        Some(Commands::Categories) => cmd_vocabulary(&data_file, true, json),
        Some(Commands::Tags) => cmd_vocabulary(&data_file, false, json),
        Some(Commands::Stats) => cmd_stats(&data_file, json),
        Some(Commands::Tui { player }) => vidcat::tui::run(CatalogStore::open(&data_file), player),
    }
}

fn parse_sort(s: &str) -> vidcat::errors::Result<SortKey> {
    SortKey::parse(s).ok_or_else(|| {
        CatalogError::InvalidInput(format!(
            "unknown sort key \"{}\" (expected date-desc, date-asc, title-asc, title-desc)",
            s
        ))
    })
}

fn cmd_page(
    data_file: &std::path::Path,
    params: QueryParams,
    page: usize,
    json: bool,
) -> vidcat::errors::Result<()> {
    if page < 1 {
        return Err(CatalogError::InvalidInput("page must be >= 1".to_string()));
    }
    let store = CatalogStore::open(data_file);
    let filtered = query::apply(store.records(), &params);
    let state = PageState::new(page, PAGE_SIZE);
    let slice = pager::page_slice(&filtered, &state);
    let total_pages = pager::total_pages(filtered.len(), state.page_size);

    if json {
        let response = PageResponse {
            page,
            total_pages,
            total_matching: filtered.len(),
            videos: slice,
        };
        println!("{}", serde_json::to_string(&response)?);
        return Ok(());
    }

    if slice.is_empty() {
        if filtered.is_empty() {
            println!("No videos found. Try different search criteria.");
        } else {
            println!("Page {} is empty ({} page(s) available).", page, total_pages);
        }
        return Ok(());
    }

    for record in slice {
        print_record_row(record);
    }
    if total_pages > 1 {
        println!("{}", render_controls(filtered.len(), &state));
    }
    Ok(())
}

fn cmd_get(data_file: &std::path::Path, id: &str, json: bool) -> vidcat::errors::Result<()> {
    let store = CatalogStore::open(data_file);
    let record = store.get(id)?;

    if json {
        println!("{}", serde_json::to_string(record)?);
        return Ok(());
    }

    print_record_detail(record);
    Ok(())
}

fn cmd_open(
    data_file: &std::path::Path,
    id: &str,
    player_program: Option<&str>,
    json: bool,
) -> vidcat::errors::Result<()> {
    let store = CatalogStore::open(data_file);
    let record = store.get(id)?;
    let path = record
        .local_path
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            CatalogError::InvalidInput(format!("video {} has no file path", record.id))
        })?;

    let pid = player::open_external(std::path::Path::new(path), player_program)?;
    let message = format!("Playing {} (pid {}).", path, pid);

    print_status(json, StatusResponse {
        success: true,
        message,
    });
    Ok(())
}

fn cmd_copy_path(data_file: &std::path::Path, id: &str, json: bool) -> vidcat::errors::Result<()> {
    let store = CatalogStore::open(data_file);
    let record = store.get(id)?;
    let path = record
        .local_path
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            CatalogError::InvalidInput(format!("video {} has no file path", record.id))
        })?;

    player::copy_path(path)?;
    print_status(json, StatusResponse {
        success: true,
        message: format!("Copied {} to clipboard.", path),
    });
    Ok(())
}

fn cmd_vocabulary(
    data_file: &std::path::Path,
    categories: bool,
    json: bool,
) -> vidcat::errors::Result<()> {
    let store = CatalogStore::open(data_file);
    let values = if categories {
        store.categories()
    } else {
        store.tags()
    };

    if json {
        println!("{}", serde_json::to_string(&values)?);
        return Ok(());
    }

    if values.is_empty() {
        println!("(none)");
        return Ok(());
    }
    for value in values {
        println!("{}", value);
    }
    Ok(())
}

fn cmd_stats(data_file: &std::path::Path, json: bool) -> vidcat::errors::Result<()> {
    let store = CatalogStore::open(data_file);
    let mut dates: Vec<&VideoRecord> = store.records().iter().collect();
    dates.sort_by_key(|r| r.sort_date);
    let oldest = dates.first().map(|r| r.date.clone());
    let newest = dates.last().map(|r| r.date.clone());

    if json {
        let response = StatsResponse {
            total_videos: store.len(),
            categories: store.categories().len(),
            tags: store.tags().len(),
            oldest_date: oldest,
            newest_date: newest,
            used_fallback: store.used_fallback(),
        };
        println!("{}", serde_json::to_string(&response)?);
        return Ok(());
    }

    println!("Catalog Statistics");
    println!("──────────────────");
    println!("Total videos: {}", store.len());
    println!("Categories:   {}", store.categories().len());
    println!("Tags:         {}", store.tags().len());
    if let Some(oldest) = oldest {
        println!("Oldest:       {}", oldest);
    }
    if let Some(newest) = newest {
        println!("Newest:       {}", newest);
    }
    if store.used_fallback() {
        println!("Source:       built-in fallback data");
    }
    Ok(())
}

fn print_status(json: bool, response: StatusResponse) {
    if json {
        match serde_json::to_string(&response) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("error: {}", e),
        }
    } else {
        println!("{}", response.message);
    }
}

fn print_record_row(record: &VideoRecord) {
    let category = record.categories.first().map(String::as_str).unwrap_or("");
    let tags = if record.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", record.tags.join(", "))
    };
    println!(
        "{:>6} {:>10}  {}  {}{}",
        record.id, record.date, record.title, category, tags
    );
}

fn print_record_detail(record: &VideoRecord) {
    println!("ID:         {}", record.id);
    println!("Title:      {}", record.title);
    println!("Date:       {}", record.date);
    if !record.categories.is_empty() {
        println!("Categories: {}", record.categories.join(", "));
    }
    if !record.tags.is_empty() {
        println!("Tags:       {}", record.tags.join(", "));
    }
    println!(
        "Path:       {}",
        record
            .local_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or("not available")
    );
    if let Some(ref description) = record.description {
        println!("─────────────────────────");
        println!("{}", description);
    }
}

/// Textual rendering of the pagination controls, e.g. `«  1  …  4 [5] 6  …  12  »`.
fn render_controls(total_matching: usize, state: &PageState) -> String {
    let mut out = String::new();
    for control in pager::controls(total_matching, state) {
        match control {
            PageControl::Prev(_) => out.push_str("«  "),
            PageControl::Page { number, active } => {
                if active {
                    out.push_str(&format!("[{}] ", number));
                } else {
                    out.push_str(&format!(" {}  ", number));
                }
            }
            PageControl::Ellipsis => out.push_str("…  "),
            PageControl::Next(_) => out.push_str(" »"),
        }
    }
    out.trim_end().to_string()
}
