//! Storage access for books and their notes.

use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entity::{book, note};
use super::models::BookFields;

/// Books and notes backed by a pooled sea-orm connection.
#[derive(Clone)]
pub struct Library {
    db: DatabaseConnection,
}

impl Library {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Every book, oldest first.
    pub async fn list_books(&self) -> Result<Vec<book::Model>, DbErr> {
        book::Entity::find()
            .order_by_asc(book::Column::CreatedAt)
            .order_by_asc(book::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn create_book(&self, fields: BookFields) -> Result<book::Model, DbErr> {
        book::ActiveModel {
            id: Set(new_id()),
            title: Set(fields.title),
            author: Set(fields.author),
            status: Set(fields.status),
            created_at: Set(now()),
        }
        .insert(&self.db)
        .await
    }

    pub async fn find_book(&self, id: &str) -> Result<Option<book::Model>, DbErr> {
        book::Entity::find_by_id(id.to_string()).one(&self.db).await
    }

    /// Replace every mutable field of a book. `None` when no book has `id`.
    pub async fn update_book(
        &self,
        id: &str,
        fields: BookFields,
    ) -> Result<Option<book::Model>, DbErr> {
        let Some(existing) = self.find_book(id).await? else {
            return Ok(None);
        };

        let mut active: book::ActiveModel = existing.into();
        active.title = Set(fields.title);
        active.author = Set(fields.author);
        active.status = Set(fields.status);

        match active.update(&self.db).await {
            Ok(updated) => Ok(Some(updated)),
            // Deleted between the lookup and the write.
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete a book together with its notes in one transaction.
    ///
    /// Returns `false` and leaves storage untouched when no book has `id`.
    pub async fn delete_book(&self, id: &str) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;

        let notes = note::Entity::delete_many()
            .filter(note::Column::BookId.eq(id))
            .exec(&txn)
            .await?;

        let books = book::Entity::delete_by_id(id.to_string())
            .exec(&txn)
            .await?;

        if books.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        txn.commit().await?;

        tracing::debug!(
            book_id = id,
            notes_deleted = notes.rows_affected,
            "book and notes removed"
        );
        Ok(true)
    }

    /// Notes of a book in insertion order. `None` when the book is missing.
    pub async fn list_notes(&self, book_id: &str) -> Result<Option<Vec<note::Model>>, DbErr> {
        let Some(book) = self.find_book(book_id).await? else {
            return Ok(None);
        };

        let notes = book
            .find_related(note::Entity)
            .order_by_asc(note::Column::CreatedAt)
            .order_by_asc(note::Column::Id)
            .all(&self.db)
            .await?;

        Ok(Some(notes))
    }

    /// Attach a note to a book. `None` when the book is missing.
    pub async fn create_note(
        &self,
        book_id: &str,
        content: String,
    ) -> Result<Option<note::Model>, DbErr> {
        if self.find_book(book_id).await?.is_none() {
            return Ok(None);
        }

        let created = note::ActiveModel {
            id: Set(new_id()),
            book_id: Set(book_id.to_string()),
            content: Set(content),
            created_at: Set(now()),
        }
        .insert(&self.db)
        .await?;

        Ok(Some(created))
    }
}

fn new_id() -> String {
    Uuid::now_v7().to_string()
}

// Microsecond precision, matching what TIMESTAMPTZ stores.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
