use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Job listing record. `user_id` is the owning account, nullable in the
/// schema. Listings keep no timestamps or history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub pay: String,
    pub category: String,
    pub poster_name: String,
    pub poster_contact: String,
    pub user_id: Option<i64>,
}

/// Mutable listing fields, bound in one statement so a partial write is
/// never observable.
pub struct JobFields<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub pay: &'a str,
    pub category: &'a str,
    pub poster_name: &'a str,
    pub poster_contact: &'a str,
}

impl Job {
    pub async fn create(
        db: &PgPool,
        fields: JobFields<'_>,
        user_id: Option<i64>,
    ) -> anyhow::Result<Job> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (title, description, location, pay, category,
                              poster_name, poster_contact, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, description, location, pay, category,
                      poster_name, poster_contact, user_id
            "#,
        )
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.location)
        .bind(fields.pay)
        .bind(fields.category)
        .bind(fields.poster_name)
        .bind(fields.poster_contact)
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(job)
    }

    /// All listings, or only those whose category equals the filter exactly.
    pub async fn list(db: &PgPool, category: Option<&str>) -> anyhow::Result<Vec<Job>> {
        let jobs = match category {
            Some(category) => {
                sqlx::query_as::<_, Job>(
                    r#"
                    SELECT id, title, description, location, pay, category,
                           poster_name, poster_contact, user_id
                    FROM jobs
                    WHERE category = $1
                    "#,
                )
                .bind(category)
                .fetch_all(db)
                .await?
            }
            None => {
                sqlx::query_as::<_, Job>(
                    r#"
                    SELECT id, title, description, location, pay, category,
                           poster_name, poster_contact, user_id
                    FROM jobs
                    "#,
                )
                .fetch_all(db)
                .await?
            }
        };
        Ok(jobs)
    }

    /// Listings owned by a given user.
    pub async fn list_by_owner(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, title, description, location, pay, category,
                   poster_name, poster_contact, user_id
            FROM jobs
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(jobs)
    }

    /// Wholesale replacement of all mutable fields. Identity and ownership
    /// never change. Returns None when the id does not exist.
    pub async fn update(
        db: &PgPool,
        id: i64,
        fields: JobFields<'_>,
    ) -> anyhow::Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET title = $2, description = $3, location = $4, pay = $5,
                category = $6, poster_name = $7, poster_contact = $8
            WHERE id = $1
            RETURNING id, title, description, location, pay, category,
                      poster_name, poster_contact, user_id
            "#,
        )
        .bind(id)
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.location)
        .bind(fields.pay)
        .bind(fields.category)
        .bind(fields.poster_name)
        .bind(fields.poster_contact)
        .fetch_optional(db)
        .await?;
        Ok(job)
    }

    /// Delete by id. Returns false when nothing was deleted, so a repeated
    /// delete of the same id surfaces as not-found rather than success.
    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM jobs WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
