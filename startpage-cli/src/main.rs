use clap::{Parser, Subcommand};
use startpage_core::{
    CategoryFilter, Effect, LinkUpdate, NewLink, NewSearchEngine, PageRequest, Paginator,
    RestClient, SearchEngineUpdate, StartPageConfig, StartPageError, auto_icon, builtin_engines,
    default_engine, find_engine,
};
use std::error::Error;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "startpage-cli")]
#[command(about = "A CLI for browsing and managing start page quick links")]
struct Cli {
    /// Backend base URL (overrides config file and STARTPAGE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Print the API calls made before exiting
    #[arg(long, global = true)]
    history: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List quick links
    Links {
        /// Only links in this category ("all" for every category)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List link categories
    Categories,
    /// Show one page of the link grid as laid out for a viewport width
    Pages {
        /// Viewport width in pixels
        #[arg(short, long)]
        width: f32,
        #[arg(short, long)]
        category: Option<String>,
        /// Page to show, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,
    },
    /// Show the width breakpoints and the grid each one uses
    Layouts {
        /// Mark the breakpoint this width falls into
        #[arg(short, long)]
        width: Option<f32>,
    },
    /// Add a quick link
    Add {
        name: String,
        url: String,
        #[arg(long)]
        category: Option<String>,
        /// Accent color as #RRGGBB
        #[arg(long)]
        color: Option<String>,
        /// Icon class, e.g. "fas fa-code" (picked from the domain when omitted)
        #[arg(long)]
        icon: Option<String>,
    },
    /// Change fields of an existing quick link
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Remove a quick link
    Remove { id: i64 },
    /// Resolve a search URL through the backend (recorded in search history)
    Search {
        query: String,
        /// Engine name, e.g. "google"
        #[arg(short, long)]
        engine: Option<String>,
    },
    /// Show recent searches
    SearchHistory {
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Manage search engines (lists them when no subcommand is given)
    Engines {
        #[command(subcommand)]
        command: Option<EngineCommands>,
    },
}

#[derive(Subcommand)]
enum EngineCommands {
    /// List search engines
    List {
        /// Include inactive engines
        #[arg(long)]
        all: bool,
    },
    /// Add a search engine
    Add {
        name: String,
        display_name: String,
        /// URL with a {query} placeholder
        url_template: String,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// Make it the default engine
        #[arg(long)]
        default: bool,
    },
    /// Change fields of a search engine
    Update {
        id: i64,
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        url_template: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        sort_order: Option<i32>,
    },
    /// Make a search engine the default
    SetDefault { id: i64 },
    /// Remove a search engine
    Remove { id: i64 },
}

/// Jump straight to `page`, running the transition to completion.
fn show_page(paginator: &mut Paginator, page: usize) -> bool {
    let now = Instant::now();
    let mut effect = paginator.request_page_change(PageRequest::GoTo(page), now);
    while let Some(Effect::Transition(scheduled)) = effect {
        effect = paginator.on_transition_tick(scheduled.tick, now + scheduled.after);
    }
    paginator.displayed_page() == page
}

/// Zero-based index for a page number given on the command line.
fn page_index(page: usize) -> Result<usize, String> {
    page.checked_sub(1)
        .ok_or_else(|| "Pages are numbered from 1".to_string())
}

fn context(action: &str) -> impl FnOnce(StartPageError) -> String + '_ {
    move |e| format!("Failed to {}: {}", action, e)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = StartPageConfig::load()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
        config.validate()?;
    }
    let client = RestClient::new(&config.api_base_url, config.request_timeout())?;

    let result = run(cli.command, &client, &config).await;

    if cli.history {
        for call in client.api_call_history() {
            println!(
                "{} {} {} -> {}{}",
                call.timestamp,
                call.method,
                call.url,
                call.status_code,
                if call.success { "" } else { " (failed)" }
            );
        }
    }

    result
}

async fn run(
    command: Commands,
    client: &RestClient,
    config: &StartPageConfig,
) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Links { category } => {
            let filter = CategoryFilter::from_option(category.as_deref());
            let links = client
                .quick_links(&filter)
                .await
                .map_err(context("load quick links"))?;
            println!("{} quick links ({}):", links.len(), filter);
            for link in &links {
                println!(
                    "  [{}] {} - {} ({}, {})",
                    link.id,
                    link.name,
                    link.url,
                    link.category.as_deref().unwrap_or("-"),
                    link.icon
                );
            }
        }
        Commands::Categories => {
            let categories = client
                .categories()
                .await
                .map_err(context("load categories"))?;
            for category in categories {
                println!("{}", category);
            }
        }
        Commands::Pages {
            width,
            category,
            page,
        } => {
            let index = page_index(page)?;
            let filter = CategoryFilter::from_option(category.as_deref());
            let mut paginator = Paginator::new(config, width);
            startpage_core::refresh_links(client, &mut paginator, &filter)
                .await
                .map_err(context("load quick links"))?;

            let layout = paginator.layout();
            println!(
                "Layout {}x{} ({} per page), {} links, {} pages",
                layout.columns,
                layout.rows,
                layout.items_per_page(),
                paginator.items().len(),
                paginator.total_pages()
            );
            if paginator.is_empty() {
                println!("No quick links in '{}'", filter);
                return Ok(());
            }

            if index != 0 && !show_page(&mut paginator, index) {
                return Err(format!(
                    "Page {} does not exist (1-{})",
                    page,
                    paginator.total_pages()
                )
                .into());
            }

            println!("Page {} of {}:", page, paginator.total_pages());
            for row in paginator.visible_items().chunks(layout.columns) {
                let names: Vec<&str> = row.iter().map(|link| link.name.as_str()).collect();
                println!("  {}", names.join(" | "));
            }
        }
        Commands::Layouts { width } => {
            let selected = width.map(|w| config.breakpoints.bucket(w));
            let mut lower = 0.0;
            for (index, breakpoint) in config.breakpoints.breakpoints().iter().enumerate() {
                let range = match breakpoint.max_width {
                    Some(max) => format!("{:>6} - {:<6}", lower, max),
                    None => format!("{:>6} +      ", lower),
                };
                let layout = breakpoint.layout;
                println!(
                    "{} px  {}x{} ({} per page){}",
                    range,
                    layout.columns,
                    layout.rows,
                    layout.items_per_page(),
                    if selected == Some(index) { " <" } else { "" }
                );
                if let Some(max) = breakpoint.max_width {
                    lower = max;
                }
            }
        }
        Commands::Add {
            name,
            url,
            category,
            color,
            icon,
        } => {
            let mut link = NewLink::new(name, url);
            link.icon = icon.unwrap_or_else(|| auto_icon(&link.url).to_string());
            if let Some(category) = category {
                link.category = category;
            }
            if let Some(color) = color {
                link.color = color;
            }
            let created = client
                .create_link(&link)
                .await
                .map_err(context("add link"))?;
            println!(
                "Added [{}] {} - {} ({})",
                created.id, created.name, created.url, created.icon
            );
        }
        Commands::Update {
            id,
            name,
            url,
            category,
            color,
            icon,
        } => {
            let update = LinkUpdate {
                name,
                url,
                icon,
                color,
                category,
            };
            let updated = client
                .update_link(id, &update)
                .await
                .map_err(|e| format!("Failed to update link {}: {}", id, e))?;
            println!("Updated [{}] {} - {}", updated.id, updated.name, updated.url);
        }
        Commands::Remove { id } => {
            client
                .delete_link(id)
                .await
                .map_err(|e| format!("Failed to remove link {}: {}", id, e))?;
            println!("Removed link {}", id);
        }
        Commands::Search { query, engine } => {
            let engines = match client.search_engines(true).await {
                Ok(engines) if !engines.is_empty() => engines,
                Ok(_) => builtin_engines(),
                Err(e) => {
                    log::warn!("Using built-in search engines: {}", e);
                    builtin_engines()
                }
            };
            let selected = match engine.as_deref() {
                Some(name) => find_engine(&engines, name),
                None => default_engine(&engines),
            }
            .ok_or_else(|| format!("Unknown search engine '{}'", engine.unwrap_or_default()))?;

            match client.search(&query, &selected.name).await {
                Ok(response) => println!("{}", response.search_url),
                // backend unreachable: build the URL here, unrecorded
                Err(StartPageError::Network(e)) => {
                    log::warn!("Backend search unavailable, building URL locally: {}", e);
                    println!("{}", selected.search_url(&query)?);
                }
                Err(e) => return Err(context("search")(e).into()),
            }
        }
        Commands::SearchHistory { limit } => {
            let history = client
                .search_history(limit)
                .await
                .map_err(context("load search history"))?;
            for entry in history {
                println!(
                    "{}  {} ({})",
                    entry.created_at.as_deref().unwrap_or("-"),
                    entry.query,
                    entry.search_engine
                );
            }
        }
        Commands::Engines { command } => {
            run_engines(command.unwrap_or(EngineCommands::List { all: false }), client).await?
        }
    }

    Ok(())
}

async fn run_engines(command: EngineCommands, client: &RestClient) -> Result<(), Box<dyn Error>> {
    match command {
        EngineCommands::List { all } => {
            let engines = client
                .search_engines(!all)
                .await
                .map_err(context("load search engines"))?;
            for engine in &engines {
                println!(
                    "  [{}] {} ({}){}{} - {}",
                    engine.id,
                    engine.display_name,
                    engine.name,
                    if engine.is_default { " default" } else { "" },
                    if engine.is_active { "" } else { " inactive" },
                    engine.url_template
                );
            }
        }
        EngineCommands::Add {
            name,
            display_name,
            url_template,
            icon,
            color,
            default,
        } => {
            let mut engine = NewSearchEngine::new(name, display_name, url_template);
            if let Some(icon) = icon {
                engine.icon = icon;
            }
            if let Some(color) = color {
                engine.color = color;
            }
            engine.is_default = default;
            let created = client
                .create_search_engine(&engine)
                .await
                .map_err(context("add search engine"))?;
            println!("Added engine [{}] {}", created.id, created.display_name);
        }
        EngineCommands::Update {
            id,
            display_name,
            url_template,
            icon,
            color,
            active,
            sort_order,
        } => {
            let update = SearchEngineUpdate {
                display_name,
                url_template,
                icon,
                color,
                is_active: active,
                sort_order,
                ..Default::default()
            };
            let updated = client
                .update_search_engine(id, &update)
                .await
                .map_err(|e| format!("Failed to update search engine {}: {}", id, e))?;
            println!("Updated engine [{}] {}", updated.id, updated.display_name);
        }
        EngineCommands::SetDefault { id } => {
            let engine = client
                .set_default_search_engine(id)
                .await
                .map_err(|e| format!("Failed to set default search engine {}: {}", id, e))?;
            println!("{} is now the default search engine", engine.display_name);
        }
        EngineCommands::Remove { id } => {
            client
                .delete_search_engine(id)
                .await
                .map_err(|e| format!("Failed to remove search engine {}: {}", id, e))?;
            println!("Removed search engine {}", id);
        }
    }
    Ok(())
}
