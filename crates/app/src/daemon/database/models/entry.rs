use common::prelude::{
    ensure_author, AccessError, Entry, EntryDraft, EntryEdit, EntryFilter, UserId,
};
use sqlx::types::Json;
use sqlx::{FromRow, QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::daemon::database::types::{DTime, DUuid};
use crate::daemon::database::Database;

const ENTRY_COLUMNS: &str = r#"
    id, kind, author_id, visibility, title, body, tags, photos,
    entry_date, created_at, updated_at
"#;

#[derive(Debug, FromRow)]
struct EntryRow {
    id: DUuid,
    kind: String,
    author_id: DUuid,
    visibility: String,
    title: Option<String>,
    body: Option<String>,
    tags: Json<Vec<String>>,
    photos: Json<Vec<String>>,
    entry_date: DTime,
    created_at: DTime,
    updated_at: DTime,
}

impl TryFrom<EntryRow> for Entry {
    type Error = sqlx::Error;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let decode = |e: common::prelude::ValidationError| sqlx::Error::Decode(Box::new(e));
        Ok(Entry {
            id: row.id.into(),
            kind: row.kind.parse().map_err(decode)?,
            author_id: row.author_id.into(),
            visibility: row.visibility.parse().map_err(decode)?,
            title: row.title,
            body: row.body,
            tags: row.tags.0,
            photos: row.photos.0,
            entry_date: row.entry_date.into(),
            created_at: row.created_at.into(),
            updated_at: row.updated_at.into(),
        })
    }
}

/// Why an edit or a deletion did not happen.
#[derive(Debug, thiserror::Error)]
pub enum EntryWriteError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Database {
    /// Store a new entry written by `author`.
    pub async fn create_entry(
        &self,
        author: &UserId,
        draft: &EntryDraft,
    ) -> Result<Entry, sqlx::Error> {
        let id = DUuid::new();
        let now = DTime::now();
        let entry_date = draft.entry_date.map(DTime::from).unwrap_or(now);

        sqlx::query(
            r#"
            INSERT INTO entries (
                id, kind, author_id, visibility, title, body, tags, photos,
                entry_date, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            "#,
        )
        .bind(id)
        .bind(draft.kind.as_str())
        .bind(DUuid::from(*author))
        .bind(draft.visibility.as_str())
        .bind(draft.title.as_deref())
        .bind(draft.body.as_deref())
        .bind(Json(&draft.tags))
        .bind(Json(&draft.photos))
        .bind(entry_date)
        .bind(now)
        .execute(&**self)
        .await?;

        self.get_entry(&id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get_entry(&self, id: &Uuid) -> Result<Option<Entry>, sqlx::Error> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1"
        ))
        .bind(DUuid::from(*id))
        .fetch_optional(&**self)
        .await?;

        row.map(Entry::try_from).transpose()
    }

    /// Entries selected by `filter`, newest first.
    pub async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>, sqlx::Error> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE ("));

        for (i, scope) in filter.scopes().iter().enumerate() {
            if i > 0 {
                query.push(" OR ");
            }
            query.push("(author_id IN (");
            {
                let mut authors = query.separated(", ");
                for author in scope.authors() {
                    authors.push_bind(DUuid::from(*author));
                }
            }
            query.push(")");
            if let Some(visibility) = scope.visibility() {
                query.push(" AND visibility = ").push_bind(visibility.as_str());
            }
            query.push(")");
        }
        query.push(")");

        if let Some(kind) = filter.kind() {
            query.push(" AND kind = ").push_bind(kind.as_str());
        }

        // rowid breaks ties between entries created in the same instant
        query.push(" ORDER BY created_at DESC, rowid DESC");

        let rows = query
            .build_query_as::<EntryRow>()
            .fetch_all(&**self)
            .await?;

        rows.into_iter().map(Entry::try_from).collect()
    }

    /// Replace every editable field of entry `id`, if `requester` wrote it.
    pub async fn edit_entry(
        &self,
        requester: &UserId,
        id: &Uuid,
        edit: &EntryEdit,
    ) -> Result<Entry, EntryWriteError> {
        let entry = ensure_author(requester, self.get_entry(id).await?)?;

        sqlx::query(
            r#"
            UPDATE entries
            SET title = ?1, body = ?2, tags = ?3, photos = ?4, visibility = ?5,
                updated_at = ?6
            WHERE id = ?7 AND author_id = ?8
            "#,
        )
        .bind(edit.title.as_deref())
        .bind(edit.body.as_deref())
        .bind(Json(&edit.tags))
        .bind(Json(&edit.photos))
        .bind(edit.visibility.as_str())
        .bind(DTime::now())
        .bind(DUuid::from(entry.id))
        .bind(DUuid::from(entry.author_id))
        .execute(&**self)
        .await?;

        self.get_entry(id)
            .await?
            .ok_or(EntryWriteError::Access(AccessError::NotFound))
    }

    /// Delete entry `id`, if `requester` wrote it.
    pub async fn delete_entry(&self, requester: &UserId, id: &Uuid) -> Result<(), EntryWriteError> {
        let entry = ensure_author(requester, self.get_entry(id).await?)?;

        sqlx::query("DELETE FROM entries WHERE id = ?1 AND author_id = ?2")
            .bind(DUuid::from(entry.id))
            .bind(DUuid::from(entry.author_id))
            .execute(&**self)
            .await?;

        Ok(())
    }
}
