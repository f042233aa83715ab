//! `PgUserDaoImpl`: PostgreSQL DAO for users and contacts.

use crate::{dao::UserDao, DatabasePoolInterface};
use async_trait::async_trait;
use shaku::Component;
use sqlx::{FromRow, PgConnection};
use std::sync::Arc;
use tracing::{debug, info};
use userdir_core::{
    Contact, ContactId, DirectoryError, DirectoryResult, NewContact, NewUser, User, UserChanges, UserFilter, UserId,
};
use uuid::Uuid;

/// Users joined with their contacts; one row per contact, or one row with
/// null contact columns for a user without contacts.
const SELECT_USERS: &str = r#"
    SELECT u.id, u.avatar, u.username, u.name, u.password, u.status,
           c.id AS contact_id, c.contact_type, c.value AS contact_value
    FROM users u
    LEFT JOIN contacts c ON c.user_id = u.id
"#;

const ORDER_BY: &str = " ORDER BY u.username, u.id, c.position, c.id";

/// PostgreSQL DAO implementation.
#[derive(Component, Clone)]
#[shaku(interface = UserDao)]
pub struct PgUserDaoImpl {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgUserDaoImpl {
    /// Creates a new DAO over the given pool.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

impl std::fmt::Debug for PgUserDaoImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgUserDaoImpl").finish_non_exhaustive()
    }
}

/// Database row representation of a user joined with one contact.
#[derive(Debug, FromRow)]
struct UserContactRow {
    id: Uuid,
    avatar: Option<String>,
    username: String,
    name: Option<String>,
    password: String,
    status: String,
    contact_id: Option<Uuid>,
    contact_type: Option<String>,
    contact_value: Option<String>,
}

impl UserContactRow {
    fn contact(&self) -> DirectoryResult<Option<Contact>> {
        let (Some(id), Some(kind), Some(value)) = (self.contact_id, &self.contact_type, &self.contact_value) else {
            return Ok(None);
        };
        Ok(Some(Contact {
            id: ContactId::from(id),
            user_id: UserId::from_uuid(self.id),
            contact_type: kind.parse()?,
            value: value.clone(),
        }))
    }
}

/// Folds joined rows into users, keeping row order for users and contacts.
fn assemble(rows: Vec<UserContactRow>) -> DirectoryResult<Vec<User>> {
    let mut users: Vec<User> = Vec::new();

    for row in rows {
        let contact = row.contact()?;
        let id = UserId::from_uuid(row.id);

        match users.last_mut() {
            Some(last) if last.id == id => {
                last.contacts.extend(contact);
            }
            _ => users.push(User {
                id,
                avatar: row.avatar,
                username: row.username,
                name: row.name,
                password_hash: row.password,
                status: row.status.parse().map_err(|_| {
                    DirectoryError::Internal(format!("Invalid status '{}' stored for user {id}", row.status))
                })?,
                contacts: contact.into_iter().collect(),
            }),
        }
    }

    Ok(users)
}

/// Escapes `%`, `_` and the escape character itself for a literal LIKE match.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

async fn fetch_user(conn: &mut PgConnection, id: Uuid) -> DirectoryResult<Option<User>> {
    let sql = format!("{SELECT_USERS} WHERE u.id = $1{ORDER_BY}");
    let rows = sqlx::query_as::<_, UserContactRow>(&sql)
        .bind(id)
        .fetch_all(conn)
        .await?;

    Ok(assemble(rows)?.into_iter().next())
}

async fn insert_contacts(conn: &mut PgConnection, user_id: Uuid, contacts: &[NewContact]) -> DirectoryResult<()> {
    if contacts.is_empty() {
        return Ok(());
    }

    let kinds: Vec<String> = contacts.iter().map(|c| c.contact_type.as_str().to_string()).collect();
    let values: Vec<String> = contacts.iter().map(|c| c.value.clone()).collect();
    let positions: Vec<i32> = (0..contacts.len())
        .map(|i| i32::try_from(i).map_err(|_| DirectoryError::validation("Too many contacts")))
        .collect::<DirectoryResult<_>>()?;

    sqlx::query(
        r#"
        INSERT INTO contacts (user_id, contact_type, value, position)
        SELECT $1, t.contact_type, t.value, t.position
        FROM UNNEST($2::text[], $3::text[], $4::int4[]) AS t(contact_type, value, position)
        "#,
    )
    .bind(user_id)
    .bind(&kinds)
    .bind(&values)
    .bind(&positions)
    .execute(conn)
    .await?;

    Ok(())
}

#[async_trait]
impl UserDao for PgUserDaoImpl {
    async fn find_by_id(&self, id: UserId) -> DirectoryResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let sql = format!("{SELECT_USERS} WHERE u.id = $1{ORDER_BY}");
        let rows = sqlx::query_as::<_, UserContactRow>(&sql)
            .bind(id.into_inner())
            .fetch_all(self.pool.inner())
            .await?;

        Ok(assemble(rows)?.into_iter().next())
    }

    async fn exists(&self, id: UserId) -> DirectoryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id.into_inner())
            .fetch_one(self.pool.inner())
            .await?;
        Ok(exists)
    }

    async fn list(&self, filter: &UserFilter) -> DirectoryResult<Vec<User>> {
        debug!("Listing users with filter: {:?}", filter);

        let pattern = filter.search_term().map(|term| format!("%{}%", escape_like(term)));
        let sql = format!(
            r#"{SELECT_USERS}
            WHERE ($1::text IS NULL OR u.status = $1)
              AND ($2::text IS NULL OR u.username ILIKE $2 ESCAPE '\' OR u.name ILIKE $2 ESCAPE '\')
            {ORDER_BY}"#
        );

        let rows = sqlx::query_as::<_, UserContactRow>(&sql)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(pattern)
            .fetch_all(self.pool.inner())
            .await?;

        assemble(rows)
    }

    async fn find_all(&self) -> DirectoryResult<Vec<User>> {
        let sql = format!("{SELECT_USERS}{ORDER_BY}");
        let rows = sqlx::query_as::<_, UserContactRow>(&sql)
            .fetch_all(self.pool.inner())
            .await?;

        assemble(rows)
    }

    async fn insert(&self, user: NewUser) -> DirectoryResult<User> {
        debug!("Inserting user: {}", user.username);

        let mut tx = self.pool.inner().begin().await?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (id, avatar, username, name, password, status)
            VALUES (COALESCE($1, gen_random_uuid()), $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(user.id.map(UserId::into_inner))
        .bind(&user.avatar)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        insert_contacts(&mut *tx, id, &user.contacts).await?;

        let created = fetch_user(&mut *tx, id)
            .await?
            .ok_or_else(|| DirectoryError::internal("Inserted user not readable in its transaction"))?;

        tx.commit().await?;
        info!("Created user {} ({} contacts)", created.id, created.contacts.len());
        Ok(created)
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> DirectoryResult<Option<User>> {
        debug!("Updating user: {}", id);

        let mut tx = self.pool.inner().begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET avatar   = COALESCE($2, avatar),
                username = COALESCE($3, username),
                name     = COALESCE($4, name),
                password = COALESCE($5, password),
                status   = COALESCE($6, status)
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(&changes.avatar)
        .bind(&changes.username)
        .bind(&changes.name)
        .bind(&changes.password_hash)
        .bind(changes.status.map(|s| s.as_str()))
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query("DELETE FROM contacts WHERE user_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await?;

        insert_contacts(&mut *tx, id.into_inner(), &changes.contacts).await?;

        let updated = fetch_user(&mut *tx, id.into_inner()).await?;

        tx.commit().await?;
        info!("Updated user {}", id);
        Ok(updated)
    }

    async fn update_avatar(&self, id: UserId, avatar: &str) -> DirectoryResult<bool> {
        let result = sqlx::query("UPDATE users SET avatar = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(avatar)
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: UserId) -> DirectoryResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
