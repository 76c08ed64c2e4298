use bookshelf_app::modules::books::entity::ReadingStatus;
use bookshelf_client::Book;
use clap::{Args, Parser, Subcommand};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";

#[derive(Parser, Debug)]
#[command(name = "bookshelf-cli", version)]
#[command(about = "Manage a bookshelf server and the books it tracks", long_about = None)]
pub struct Cli {
    /// Base URL of the bookshelf API
    #[arg(
        long,
        global = true,
        env = "BOOKSHELF_API_URL",
        default_value = DEFAULT_API_URL
    )]
    pub base_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply pending database migrations
    Migrate,
    /// Print the merged OpenAPI document
    Openapi,
    /// Work with books
    #[command(subcommand)]
    Books(BooksCommand),
    /// Work with a book's notes
    #[command(subcommand)]
    Notes(NotesCommand),
}

#[derive(Subcommand, Debug)]
pub enum BooksCommand {
    /// List books, optionally filtered
    List(ListFilter),
    /// Add a book
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        /// One of not_started, in_progress, finished
        #[arg(long, default_value = "not_started")]
        status: ReadingStatus,
    },
    /// Show one book
    Show { id: String },
    /// Replace every field of a book
    Update {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        /// One of not_started, in_progress, finished
        #[arg(long)]
        status: ReadingStatus,
    },
    /// Delete a book and all of its notes
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum NotesCommand {
    /// List the notes of a book
    List { book_id: String },
    /// Add a note to a book
    Add {
        book_id: String,
        #[arg(long)]
        content: String,
    },
}

/// Client-side filters for `books list`.
#[derive(Args, Debug, Default)]
pub struct ListFilter {
    /// Only books with this status
    #[arg(long)]
    pub status: Option<ReadingStatus>,
    /// Case-insensitive match against title or author
    #[arg(long)]
    pub search: Option<String>,
}

impl ListFilter {
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(status) = self.status {
            if book.status != status.as_str() {
                return false;
            }
        }

        match &self.search {
            Some(query) => {
                let query = query.to_lowercase();
                book.title.to_lowercase().contains(&query)
                    || book.author.to_lowercase().contains(&query)
            }
            None => true,
        }
    }
}
