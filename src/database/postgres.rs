use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::models::{
    Folder, NewParameter, NewUser, ParamKind, Parameter, Request, RequestContent, RequestDraft, User,
};
use crate::database::schema;
use crate::database::store::{Store, StoreError};
use crate::types::{Depth, EntityId};

const REQUEST_COLUMNS: &str = "id, folder_id, user_id, name, url, result, method, protocol_header";

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open a pool using the configured connection settings
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let connection_string = config.connection_url()?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&connection_string)
            .await?;
        info!("Created database pool ({} max connections)", config.max_connections);
        Ok(Self { pool })
    }

    /// Create tables and indexes that do not exist yet
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for statement in schema::STATEMENTS {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        info!("Applied {} schema statements", schema::STATEMENTS.len());
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    async fn parameters_for(&self, request_ids: &[EntityId]) -> Result<HashMap<EntityId, Vec<Parameter>>, StoreError> {
        let mut grouped: HashMap<EntityId, Vec<Parameter>> = HashMap::new();
        if request_ids.is_empty() {
            return Ok(grouped);
        }
        let rows = sqlx::query(
            "SELECT id, kind, key, value, request_id FROM parameters WHERE request_id = ANY($1) ORDER BY id",
        )
        .bind(request_ids)
        .fetch_all(&self.pool)
        .await?;
        for row in rows {
            let param = parameter_from_row(&row)?;
            grouped.entry(param.request_id).or_default().push(param);
        }
        Ok(grouped)
    }
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        password: row.try_get("password")?,
        folders: Vec::new(),
    })
}

fn folder_from_row(row: &PgRow) -> Result<Folder, StoreError> {
    Ok(Folder {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        user_id: row.try_get("user_id")?,
        requests: Vec::new(),
    })
}

fn request_from_row(row: &PgRow) -> Result<Request, StoreError> {
    let method: String = row.try_get("method")?;
    let scheme: String = row.try_get("protocol_header")?;
    Ok(Request {
        id: row.try_get("id")?,
        folder_id: row.try_get("folder_id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        url: row.try_get("url")?,
        result: row.try_get("result")?,
        method: method.parse().map_err(StoreError::Corrupt)?,
        protocol_header: scheme.parse().map_err(StoreError::Corrupt)?,
        parameters: Vec::new(),
    })
}

fn parameter_from_row(row: &PgRow) -> Result<Parameter, StoreError> {
    let code: i16 = row.try_get("kind")?;
    Ok(Parameter {
        id: row.try_get("id")?,
        kind: ParamKind::from_code(code)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown parameter kind {}", code)))?,
        key: row.try_get("key")?,
        value: row.try_get("value")?,
        request_id: row.try_get("request_id")?,
    })
}

/// Unique violations become `Conflict`; a vanished parent row becomes `NotFound`
fn write_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(db.message().to_string())
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StoreError::NotFound(db.message().to_string())
        }
        _ => StoreError::Sqlx(err),
    }
}

fn expect_row(rows_affected: u64, kind: &str, id: impl std::fmt::Display) -> Result<(), StoreError> {
    if rows_affected == 0 {
        return Err(StoreError::NotFound(format!("{} {}", kind, id)));
    }
    Ok(())
}

async fn insert_parameters(
    tx: &mut Transaction<'_, Postgres>,
    request_id: EntityId,
    params: Vec<NewParameter>,
) -> Result<Vec<Parameter>, StoreError> {
    let mut inserted = Vec::with_capacity(params.len());
    for p in params {
        let id: EntityId = sqlx::query_scalar(
            "INSERT INTO parameters (kind, key, value, request_id) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(p.kind.code())
        .bind(&p.key)
        .bind(&p.value)
        .bind(request_id)
        .fetch_one(&mut **tx)
        .await?;
        inserted.push(Parameter {
            id,
            kind: p.kind,
            key: p.key,
            value: p.value,
            request_id,
        });
    }
    Ok(inserted)
}

async fn delete_requests_where(
    tx: &mut Transaction<'_, Postgres>,
    column: &'static str,
    id: EntityId,
) -> Result<u64, StoreError> {
    sqlx::query(&format!(
        "DELETE FROM parameters WHERE request_id IN (SELECT id FROM requests WHERE {} = $1)",
        column
    ))
    .bind(id)
    .execute(&mut **tx)
    .await?;
    let done = sqlx::query(&format!("DELETE FROM requests WHERE {} = $1", column))
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(done.rows_affected())
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        sqlx::query("INSERT INTO users (id, name, password) VALUES ($1, $2, $3)")
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.password)
            .execute(&self.pool)
            .await
            .map_err(write_error)?;
        Ok(User::from(user))
    }

    async fn find_user(&self, id: &str, depth: Depth) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, name, password FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut user = user_from_row(&row)?;
        if !depth.loads_children() {
            return Ok(Some(user));
        }

        let folder_rows = sqlx::query("SELECT id, name, user_id FROM folders WHERE user_id = $1 ORDER BY id")
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        let mut folders = folder_rows.iter().map(folder_from_row).collect::<Result<Vec<_>, _>>()?;
        let folder_ids: Vec<EntityId> = folders.iter().map(|f| f.id).collect();

        let request_rows = sqlx::query(&format!(
            "SELECT {} FROM requests WHERE folder_id = ANY($1) ORDER BY id",
            REQUEST_COLUMNS
        ))
        .bind(&folder_ids)
        .fetch_all(&self.pool)
        .await?;
        let mut requests = request_rows.iter().map(request_from_row).collect::<Result<Vec<_>, _>>()?;
        let request_ids: Vec<EntityId> = requests.iter().map(|r| r.id).collect();

        let mut parameters = self.parameters_for(&request_ids).await?;
        for request in &mut requests {
            request.parameters = parameters.remove(&request.id).unwrap_or_default();
        }
        let mut by_folder: HashMap<EntityId, Vec<Request>> = HashMap::new();
        for request in requests {
            by_folder.entry(request.folder_id).or_default().push(request);
        }
        for folder in &mut folders {
            folder.requests = by_folder.remove(&folder.id).unwrap_or_default();
        }
        user.folders = folders;
        Ok(Some(user))
    }

    async fn rename_user(&self, id: &str, name: &str) -> Result<(), StoreError> {
        let done = sqlx::query("UPDATE users SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        expect_row(done.rows_affected(), "user", id)
    }

    async fn create_folder(&self, owner: &str, name: &str) -> Result<Folder, StoreError> {
        let id: EntityId = sqlx::query_scalar("INSERT INTO folders (name, user_id) VALUES ($1, $2) RETURNING id")
            .bind(name)
            .bind(owner)
            .fetch_one(&self.pool)
            .await
            .map_err(write_error)?;
        Ok(Folder {
            id,
            name: name.to_string(),
            user_id: owner.to_string(),
            requests: Vec::new(),
        })
    }

    async fn find_folder(&self, id: EntityId, depth: Depth) -> Result<Option<Folder>, StoreError> {
        let row = sqlx::query("SELECT id, name, user_id FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut folder = folder_from_row(&row)?;
        if depth.loads_children() {
            let rows = sqlx::query(&format!(
                "SELECT {} FROM requests WHERE folder_id = $1 ORDER BY id",
                REQUEST_COLUMNS
            ))
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
            folder.requests = rows.iter().map(request_from_row).collect::<Result<_, _>>()?;
        }
        Ok(Some(folder))
    }

    async fn rename_folder(&self, id: EntityId, name: &str) -> Result<(), StoreError> {
        let done = sqlx::query("UPDATE folders SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        expect_row(done.rows_affected(), "folder", id)
    }

    async fn delete_folder(&self, id: EntityId) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        delete_requests_where(&mut tx, "folder_id", id).await?;
        let done = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        expect_row(done.rows_affected(), "folder", id)?;
        tx.commit().await?;
        Ok(())
    }

    async fn create_request(&self, owner: &str, draft: RequestDraft) -> Result<Request, StoreError> {
        let mut tx = self.pool.begin().await?;
        let id: EntityId = sqlx::query_scalar(
            "INSERT INTO requests (folder_id, user_id, name, url, result, method, protocol_header)
             VALUES ($1, $2, $3, $4, '', $5, $6) RETURNING id",
        )
        .bind(draft.folder_id)
        .bind(owner)
        .bind(&draft.name)
        .bind(&draft.url)
        .bind(draft.method.as_str())
        .bind(draft.protocol_header.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(write_error)?;
        let parameters = insert_parameters(&mut tx, id, draft.parameters).await?;
        tx.commit().await?;

        Ok(Request {
            id,
            folder_id: draft.folder_id,
            user_id: owner.to_string(),
            name: draft.name,
            url: draft.url,
            protocol_header: draft.protocol_header,
            method: draft.method,
            result: String::new(),
            parameters,
        })
    }

    async fn find_request(&self, id: EntityId, depth: Depth) -> Result<Option<Request>, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM requests WHERE id = $1", REQUEST_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut request = request_from_row(&row)?;
        if depth.loads_children() {
            request.parameters = self.parameters_for(&[id]).await?.remove(&id).unwrap_or_default();
        }
        Ok(Some(request))
    }

    async fn update_request(&self, id: EntityId, content: RequestContent) -> Result<Request, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!(
            "UPDATE requests SET url = $2, protocol_header = $3, method = $4, result = $5
             WHERE id = $1 RETURNING {}",
            REQUEST_COLUMNS
        ))
        .bind(id)
        .bind(&content.url)
        .bind(content.protocol_header.as_str())
        .bind(content.method.as_str())
        .bind(&content.result)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("request {}", id)))?;
        let mut request = request_from_row(&row)?;

        sqlx::query("DELETE FROM parameters WHERE request_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        request.parameters = insert_parameters(&mut tx, id, content.parameters).await?;
        tx.commit().await?;
        Ok(request)
    }

    async fn rename_request(&self, id: EntityId, name: &str) -> Result<(), StoreError> {
        let done = sqlx::query("UPDATE requests SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        expect_row(done.rows_affected(), "request", id)
    }

    async fn move_request(&self, id: EntityId, folder_id: EntityId) -> Result<(), StoreError> {
        let done = sqlx::query("UPDATE requests SET folder_id = $2 WHERE id = $1")
            .bind(id)
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(write_error)?;
        expect_row(done.rows_affected(), "request", id)
    }

    async fn delete_request(&self, id: EntityId) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        let removed = delete_requests_where(&mut tx, "id", id).await?;
        expect_row(removed, "request", id)?;
        tx.commit().await?;
        Ok(())
    }
}
