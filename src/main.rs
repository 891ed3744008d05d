//! Bookmark manager command-line client.
//!
//! Each subcommand mounts the view against the configured REST service, acts,
//! and prints the re-synced list. `shell` keeps one view alive interactively;
//! `demo` walks through a scripted session against an in-memory server.

use std::error::Error;
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use bookmark_manager::app::App;
use bookmark_manager::config::ClientConfig;
use bookmark_manager::managers::view_controller::SubmitOutcome;
use bookmark_manager::services::api_client::BookmarkApiTrait;
use bookmark_manager::services::memory_backend::MemoryBackend;
use bookmark_manager::services::theme_engine::ThemeEngineTrait;
use bookmark_manager::types::bookmark::BookmarkId;
use bookmark_manager::types::form::FormFields;
use bookmark_manager::types::settings::ThemeMode;
use bookmark_manager::ui::console::delete_prompt;

type StdinLines = Lines<BufReader<Stdin>>;

#[derive(Parser)]
#[command(name = "bookmarks", version, about = "Manage your bookmarks from the terminal")]
struct Cli {
    /// Base URL of the bookmark API (overrides BOOKMARKS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List bookmarks, optionally filtered by tag and search text
    List {
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show every tag in use
    Tags,
    /// Add a bookmark
    Add {
        #[arg(long)]
        url: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Comma-separated, at most 5
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Edit a bookmark; omitted fields keep their current value
    Edit {
        id: u64,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete a bookmark
    Delete {
        id: u64,
        /// Skip the confirmation question
        #[arg(long)]
        yes: bool,
    },
    /// Show or change the color theme
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
    /// Interactive session
    Shell,
    /// Scripted walk-through against an in-memory server
    Demo,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeAction {
    Show,
    Toggle,
    Dark,
    Light,
    System,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }

    if let Command::Demo = cli.command {
        return demo(config).await;
    }

    let mut app = App::new(config)?;
    let notices = spawn_notice_printer(&app);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let code = match cli.command {
        Command::List { tag, search } => {
            let loaded = match tag {
                Some(tag) => app.controller.select_tag(Some(tag.to_lowercase())).await,
                None => app.controller.mount().await,
            };
            if let Some(query) = search {
                app.controller.input_search(query);
                app.controller.settle_search().await;
            }
            println!("{}", app.renderer().view(app.controller.state()));
            exit_code(loaded.is_ok())
        }
        Command::Tags => match app.controller.mount().await {
            Ok(()) => {
                for tag in &app.controller.state().tags {
                    println!("{}", tag);
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", app.renderer().error(&e.to_string()));
                ExitCode::FAILURE
            }
        },
        Command::Add {
            url,
            title,
            description,
            tags,
        } => {
            app.controller.open_create_form();
            app.controller.edit_form(|fields| {
                *fields = FormFields {
                    url,
                    title,
                    description,
                    tags_input: tags,
                }
            })?;
            submit_once(&mut app).await?
        }
        Command::Edit {
            id,
            url,
            title,
            description,
            tags,
        } => {
            app.controller.mount().await?;
            app.controller.open_edit_form(BookmarkId(id))?;
            app.controller.edit_form(|fields| {
                if let Some(url) = url {
                    fields.url = url;
                }
                if let Some(title) = title {
                    fields.title = title;
                }
                if let Some(description) = description {
                    fields.description = description;
                }
                if let Some(tags) = tags {
                    fields.tags_input = tags;
                }
            })?;
            submit_once(&mut app).await?
        }
        Command::Delete { id, yes } => {
            app.controller.mount().await?;
            if delete_with_confirmation(&mut app, BookmarkId(id), yes, &mut lines).await? {
                println!("{}", app.renderer().view(app.controller.state()));
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Theme { action } => {
            match action.unwrap_or(ThemeAction::Show) {
                ThemeAction::Show => {}
                ThemeAction::Toggle => {
                    app.toggle_theme()?;
                }
                ThemeAction::Dark => app.set_theme(Some(ThemeMode::Dark))?,
                ThemeAction::Light => app.set_theme(Some(ThemeMode::Light))?,
                ThemeAction::System => app.set_theme(None)?,
            }
            let preference = app.theme_engine.get_theme().map_or("system", |m| m.as_str());
            println!(
                "Theme: {} (preference: {})",
                app.theme_engine.effective_theme().as_str(),
                preference
            );
            ExitCode::SUCCESS
        }
        Command::Shell => shell(&mut app, &mut lines).await?,
        Command::Demo => ExitCode::SUCCESS,
    };

    app.shutdown();
    notices.abort();
    Ok(code)
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Prints the wake-up notice to stderr whenever a load runs long.
fn spawn_notice_printer<A: BookmarkApiTrait>(app: &App<A>) -> JoinHandle<()> {
    let mut updates = app.controller.subscribe();
    let renderer = app.renderer();
    tokio::spawn(async move {
        let mut shown = false;
        while updates.changed().await.is_ok() {
            let notice = updates.borrow_and_update().wake_up_notice;
            if notice && !shown {
                eprintln!("{}", renderer.wake_up_notice());
            }
            shown = notice;
        }
    })
}

async fn submit_once<A: BookmarkApiTrait>(app: &mut App<A>) -> Result<ExitCode, Box<dyn Error>> {
    let renderer = app.renderer();
    match app.controller.submit_form().await? {
        SubmitOutcome::Saved(bookmark) => {
            println!("Saved:\n{}", renderer.bookmark(&bookmark, None));
            Ok(ExitCode::SUCCESS)
        }
        SubmitOutcome::Invalid(_) | SubmitOutcome::Rejected(_) => {
            if let Some(form) = &app.controller.state().form {
                eprintln!("{}", renderer.form_status(form));
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn ask(question: &str, lines: &mut StdinLines) -> std::io::Result<String> {
    print!("{}", question);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?.unwrap_or_default())
}

async fn confirm(question: &str, lines: &mut StdinLines) -> std::io::Result<bool> {
    let answer = ask(&format!("{} [y/N] ", question), lines).await?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Returns whether the bookmark was deleted.
async fn delete_with_confirmation<A: BookmarkApiTrait>(
    app: &mut App<A>,
    id: BookmarkId,
    skip_confirmation: bool,
    lines: &mut StdinLines,
) -> Result<bool, Box<dyn Error>> {
    // Unknown ids still go to the server, which has the final say.
    if let Some(bookmark) = app.controller.state().find(id).cloned() {
        if !skip_confirmation && !confirm(&delete_prompt(&bookmark), lines).await? {
            return Ok(false);
        }
    }
    match app.controller.delete(id).await {
        Ok(()) => Ok(true),
        Err(e) => {
            eprintln!("{}", app.renderer().error(&e.to_string()));
            Ok(false)
        }
    }
}

// ─── Interactive shell ───

const SHELL_HELP: &str = "\
Commands:
  list                 show the current view
  retry                reload from the server
  tag <name>           filter by tag (again to clear)
  tag                  clear the tag filter
  search <text>        filter by title or URL
  search               clear the search
  add                  add a bookmark
  edit <id>            edit a bookmark
  delete <id>          delete a bookmark
  theme                toggle dark/light
  help                 show this help
  quit                 leave";

fn print_prompt() -> std::io::Result<()> {
    print!("bookmarks> ");
    std::io::stdout().flush()
}

fn render<A: BookmarkApiTrait>(app: &App<A>) {
    println!("{}", app.renderer().view(app.controller.state()));
}

async fn shell<A: BookmarkApiTrait>(
    app: &mut App<A>,
    lines: &mut StdinLines,
) -> Result<ExitCode, Box<dyn Error>> {
    println!("Bookmark Manager v{} ({})", env!("CARGO_PKG_VERSION"), app.config.api_base_url);
    println!("Type 'help' for commands.");
    let _ = app.controller.mount().await;
    render(app);
    print_prompt()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !shell_command(app, line.trim(), lines).await? {
                    break;
                }
                print_prompt()?;
            }
            _ = app.controller.settle_search() => {
                println!();
                render(app);
                print_prompt()?;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Runs one shell command. Returns `false` to leave the shell.
async fn shell_command<A: BookmarkApiTrait>(
    app: &mut App<A>,
    line: &str,
    lines: &mut StdinLines,
) -> Result<bool, Box<dyn Error>> {
    let (command, argument) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "help" => println!("{}", SHELL_HELP),
        "list" | "ls" => render(app),
        "retry" | "reload" => {
            let _ = app.controller.retry().await;
            render(app);
        }
        "tag" if argument.is_empty() => {
            let _ = app.controller.clear_tag().await;
            render(app);
        }
        "tag" => {
            let _ = app.controller.toggle_tag(&argument.to_lowercase()).await;
            render(app);
        }
        "search" if argument.is_empty() => {
            app.controller.clear_search();
            render(app);
        }
        "search" => app.controller.input_search(argument),
        "add" => {
            app.controller.open_create_form();
            run_form(app, lines).await?;
            render(app);
        }
        "edit" => match argument.parse::<u64>() {
            Ok(id) => match app.controller.open_edit_form(BookmarkId(id)) {
                Ok(()) => {
                    run_form(app, lines).await?;
                    render(app);
                }
                Err(e) => eprintln!("{}", app.renderer().error(&e.to_string())),
            },
            Err(_) => eprintln!("usage: edit <id>"),
        },
        "delete" | "rm" => match argument.parse::<u64>() {
            Ok(id) => {
                delete_with_confirmation(app, BookmarkId(id), false, lines).await?;
                render(app);
            }
            Err(_) => eprintln!("usage: delete <id>"),
        },
        "theme" => {
            let mode = app.toggle_theme()?;
            println!("Switched to {} mode.", mode.as_str());
        }
        "quit" | "exit" | "q" => return Ok(false),
        other => eprintln!("unknown command '{}', type 'help'", other),
    }
    Ok(true)
}

/// Prompts for a field, keeping `current` when the answer is empty.
async fn prompt_field(label: &str, current: &str, lines: &mut StdinLines) -> std::io::Result<String> {
    let question = if current.is_empty() {
        format!("{}: ", label)
    } else {
        format!("{} [{}]: ", label, current)
    };
    let answer = ask(&question, lines).await?;
    Ok(if answer.trim().is_empty() {
        current.to_string()
    } else {
        answer
    })
}

/// Fills in and submits the open form until it is saved or abandoned.
async fn run_form<A: BookmarkApiTrait>(
    app: &mut App<A>,
    lines: &mut StdinLines,
) -> Result<(), Box<dyn Error>> {
    let renderer = app.renderer();
    let mut first_attempt = true;
    loop {
        let Some(form) = app.controller.state().form.clone() else {
            return Ok(());
        };
        println!("{}", renderer.form_status(&form));
        if !first_attempt && !confirm("Edit and resubmit?", lines).await? {
            app.controller.cancel_form();
            return Ok(());
        }
        first_attempt = false;

        let current = form.fields;
        let fields = FormFields {
            url: prompt_field("URL", &current.url, lines).await?,
            title: prompt_field("Title", &current.title, lines).await?,
            description: prompt_field("Description", &current.description, lines).await?,
            tags_input: prompt_field("Tags (comma separated, max 5)", &current.tags_input, lines)
                .await?,
        };
        app.controller.edit_form(|f| *f = fields)?;

        if let SubmitOutcome::Saved(bookmark) = app.controller.submit_form().await? {
            println!("Saved \"{}\".", bookmark.title);
            return Ok(());
        }
    }
}

// ─── Demo ───

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

async fn demo(config: ClientConfig) -> Result<ExitCode, Box<dyn Error>> {
    let backend = MemoryBackend::new().with_latency(Duration::from_millis(2500));
    let mut app = App::with_api(config, backend.clone());
    let notices = spawn_notice_printer(&app);
    let renderer = app.renderer();

    section("Cold start: first load takes 2.5s");
    app.controller.mount().await?;
    println!("{}", renderer.view(app.controller.state()));
    backend.set_latency(Duration::ZERO);

    section("Add a bookmark without tags");
    app.controller.open_create_form();
    app.controller.edit_form(|f| {
        f.url = "https://www.rust-lang.org".to_string();
        f.title = "Rust".to_string();
    })?;
    app.controller.submit_form().await?;
    println!("{}", renderer.view(app.controller.state()));
    println!("Tags: {:?}", app.controller.state().tags);

    section("Add a second bookmark tagged 'go'");
    app.controller.open_create_form();
    app.controller.edit_form(|f| {
        f.url = "https://go.dev".to_string();
        f.title = "Go".to_string();
        f.tags_input = "Go".to_string();
    })?;
    app.controller.submit_form().await?;
    println!("Tags: {:?}", app.controller.state().tags);

    section("Filter by tag 'go'");
    app.controller.toggle_tag("go").await?;
    println!("{}", renderer.view(app.controller.state()));
    app.controller.clear_tag().await?;

    section("Search 'RUST' (debounced, no network call)");
    let lists_before = backend.calls().list;
    app.controller.input_search("RUST");
    app.controller.settle_search().await;
    println!("{}", renderer.view(app.controller.state()));
    println!("List requests during search: {}", backend.calls().list - lists_before);
    app.controller.clear_search();

    section("Invalid form is blocked before submission");
    app.controller.open_create_form();
    app.controller.edit_form(|f| {
        f.url = "not-a-url".to_string();
        f.tags_input = "a,b,c,d,e,f".to_string();
    })?;
    app.controller.submit_form().await?;
    if let Some(form) = &app.controller.state().form {
        println!("{}", renderer.form_status(form));
    }
    app.controller.cancel_form();

    section("Delete a bookmark that does not exist");
    if let Err(e) = app.controller.delete(BookmarkId(9999)).await {
        println!("{}", renderer.error(&e.to_string()));
    }
    println!("Still listed: {}", app.controller.state().bookmarks.len());

    section("Delete 'Rust'");
    let rust = app
        .controller
        .state()
        .bookmarks
        .iter()
        .find(|b| b.title == "Rust")
        .map(|b| b.id);
    if let Some(id) = rust {
        app.controller.delete(id).await?;
    }
    println!("{}", renderer.view(app.controller.state()));

    app.shutdown();
    notices.abort();
    Ok(ExitCode::SUCCESS)
}
