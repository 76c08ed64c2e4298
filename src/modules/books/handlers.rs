use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use bookshelf_http::{AppError, ValidJson};

use super::models::{Book, BookFields, BookPayload, DeleteAck, Note, NotePayload};
use super::repository::Library;

pub async fn list_books(State(library): State<Library>) -> Result<Json<Vec<Book>>, AppError> {
    let books = library.list_books().await?;
    Ok(Json(books.into_iter().map(Book::from).collect()))
}

pub async fn create_book(
    State(library): State<Library>,
    ValidJson(payload): ValidJson<BookPayload>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let fields = BookFields::try_from(payload).map_err(anyhow::Error::from)?;
    let book = library.create_book(fields).await?;

    tracing::info!(book_id = %book.id, status = %book.status, "book created");
    Ok((StatusCode::CREATED, Json(book.into())))
}

pub async fn get_book(
    State(library): State<Library>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    library
        .find_book(&id)
        .await?
        .map(|book| Json(book.into()))
        .ok_or_else(|| book_not_found(&id))
}

pub async fn update_book(
    State(library): State<Library>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<BookPayload>,
) -> Result<Json<Book>, AppError> {
    let fields = BookFields::try_from(payload).map_err(anyhow::Error::from)?;
    let book = library
        .update_book(&id, fields)
        .await?
        .ok_or_else(|| book_not_found(&id))?;

    tracing::info!(book_id = %book.id, status = %book.status, "book updated");
    Ok(Json(book.into()))
}

pub async fn delete_book(
    State(library): State<Library>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    if !library.delete_book(&id).await? {
        return Err(book_not_found(&id));
    }

    tracing::info!(book_id = %id, "book deleted with its notes");
    Ok(Json(DeleteAck {
        message: "Book and all its notes deleted successfully".to_string(),
    }))
}

pub async fn list_notes(
    State(library): State<Library>,
    Path(book_id): Path<String>,
) -> Result<Json<Vec<Note>>, AppError> {
    let notes = library
        .list_notes(&book_id)
        .await?
        .ok_or_else(|| book_not_found(&book_id))?;

    Ok(Json(notes.into_iter().map(Note::from).collect()))
}

pub async fn create_note(
    State(library): State<Library>,
    Path(book_id): Path<String>,
    ValidJson(payload): ValidJson<NotePayload>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let note = library
        .create_note(&book_id, payload.content)
        .await?
        .ok_or_else(|| book_not_found(&book_id))?;

    tracing::info!(note_id = %note.id, book_id = %note.book_id, "note created");
    Ok((StatusCode::CREATED, Json(note.into())))
}

fn book_not_found(id: &str) -> AppError {
    AppError::not_found(format!("Book '{}' not found", id))
}
