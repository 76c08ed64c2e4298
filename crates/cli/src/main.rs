mod args;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use args::{BooksCommand, Cli, Command, NotesCommand};
use bookshelf_client::{BookInput, BookshelfClient, NoteInput};
use bookshelf_kernel::settings::{Settings, TelemetrySettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Migrate => migrate().await,
        Command::Openapi => {
            let registry = bookshelf_app::registry();
            print_json(&bookshelf_http::openapi_document(&registry))
        }
        Command::Books(command) => {
            quiet_telemetry()?;
            books(&client(&cli.base_url)?, command).await
        }
        Command::Notes(command) => {
            quiet_telemetry()?;
            notes(&client(&cli.base_url)?, command).await
        }
    }
}

async fn migrate() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load bookshelf settings")?;
    bookshelf_telemetry::init_stderr(&settings.telemetry)?;

    let db = bookshelf_db::connect(&settings.database).await?;
    let registry = bookshelf_app::registry();
    let applied = bookshelf_app::migrate(&registry, &db).await?;

    tracing::info!(applied, "migrations finished");
    println!("applied {} migration(s)", applied);
    Ok(())
}

async fn books(client: &BookshelfClient, command: BooksCommand) -> anyhow::Result<()> {
    tracing::debug!(?command, base_url = client.base_url(), "calling books API");

    match command {
        BooksCommand::List(filter) => {
            let books: Vec<_> = client
                .list_books()
                .await?
                .into_iter()
                .filter(|book| filter.matches(book))
                .collect();
            print_json(&books)
        }
        BooksCommand::Add {
            title,
            author,
            status,
        } => {
            let input = BookInput {
                title,
                author,
                status: status.to_string(),
            };
            print_json(&client.create_book(&input).await?)
        }
        BooksCommand::Show { id } => print_json(&client.get_book(&id).await?),
        BooksCommand::Update {
            id,
            title,
            author,
            status,
        } => {
            let input = BookInput {
                title,
                author,
                status: status.to_string(),
            };
            print_json(&client.update_book(&id, &input).await?)
        }
        BooksCommand::Delete { id } => print_json(&client.delete_book(&id).await?),
    }
}

async fn notes(client: &BookshelfClient, command: NotesCommand) -> anyhow::Result<()> {
    tracing::debug!(?command, base_url = client.base_url(), "calling notes API");

    match command {
        NotesCommand::List { book_id } => print_json(&client.list_notes(&book_id).await?),
        NotesCommand::Add { book_id, content } => {
            print_json(&client.create_note(&book_id, &NoteInput { content }).await?)
        }
    }
}

fn client(base_url: &str) -> anyhow::Result<BookshelfClient> {
    BookshelfClient::new(base_url).context("failed to build API client")
}

// API commands print JSON on stdout; only warnings go to stderr.
fn quiet_telemetry() -> anyhow::Result<()> {
    bookshelf_telemetry::init_stderr(&TelemetrySettings {
        log_level: "warn".to_string(),
        ..TelemetrySettings::default()
    })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{}", rendered);
    Ok(())
}
