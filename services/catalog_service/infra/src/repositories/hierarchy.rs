//! PostgreSQL closure-table implementation of the hierarchy index
//! (spec §4.1).

use async_trait::async_trait;
use catalog_service_core::repositories::HierarchyRepository;
use shared_error::AppError;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

pub struct PgHierarchyRepository {
    #[allow(dead_code)]
    pool: PgPool,
}

impl PgHierarchyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HierarchyRepository for PgHierarchyRepository {
    async fn ancestors(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Uuid>>, AppError> {
        let mut out: HashMap<Uuid, Vec<Uuid>> = ids.iter().map(|&id| (id, Vec::new())).collect();
        if ids.is_empty() {
            return Ok(out);
        }
        let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT descendant_id, ancestor_id FROM hierarchy_edges WHERE descendant_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&mut **tx)
        .await?;
        for (descendant_id, ancestor_id) in rows {
            out.entry(descendant_id).or_default().push(ancestor_id);
        }
        Ok(out)
    }

    async fn build(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };

        sqlx::query(
            "INSERT INTO hierarchy_edges (ancestor_id, descendant_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(parent_id)
        .bind(unit_id)
        .execute(&mut **tx)
        .await?;

        sqlx::query(
            "INSERT INTO hierarchy_edges (ancestor_id, descendant_id) \
             SELECT ancestor_id, $2 FROM hierarchy_edges WHERE descendant_id = $1 \
             ON CONFLICT DO NOTHING",
        )
        .bind(parent_id)
        .bind(unit_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn destroy(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category_id: Uuid,
    ) -> Result<(), AppError> {
        // S = {category_id} union every descendant of category_id,
        // offers included — not just the descendant categories. Every
        // unit in S, whatever its kind, has its own ancestor edges (an
        // offer is never itself an ancestor, but it is still a
        // `descendant_id` in edges reaching down to it from every
        // category above it, including categories outside S). Removing
        // every edge touching S on either side covers both "edges
        // inside the removed subtree" and "edges from outside ancestors
        // into it"; leaving an offer's edges behind would dangle the FK
        // once the executor deletes its unit row (spec §4.1, §4.5).
        let mut subtree_ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT descendant_id FROM hierarchy_edges WHERE ancestor_id = $1")
                .bind(category_id)
                .fetch_all(&mut **tx)
                .await?;
        subtree_ids.push(category_id);

        sqlx::query("DELETE FROM hierarchy_edges WHERE ancestor_id = ANY($1) OR descendant_id = ANY($1)")
            .bind(&subtree_ids)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    async fn rebuild(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let mut subtree_ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT descendant_id FROM hierarchy_edges WHERE ancestor_id = $1")
                .bind(unit_id)
                .fetch_all(&mut **tx)
                .await?;
        subtree_ids.push(unit_id);

        // Drop edges from ancestors outside the subtree into it; edges
        // among the subtree's own members (ancestor also in `subtree_ids`)
        // are left untouched.
        sqlx::query(
            "DELETE FROM hierarchy_edges WHERE descendant_id = ANY($1) AND ancestor_id <> ALL($1)",
        )
        .bind(&subtree_ids)
        .execute(&mut **tx)
        .await?;

        let Some(new_parent_id) = new_parent_id else {
            return Ok(());
        };

        let mut new_ancestors: Vec<Uuid> =
            sqlx::query_scalar("SELECT ancestor_id FROM hierarchy_edges WHERE descendant_id = $1")
                .bind(new_parent_id)
                .fetch_all(&mut **tx)
                .await?;
        new_ancestors.push(new_parent_id);

        sqlx::query(
            r#"
            INSERT INTO hierarchy_edges (ancestor_id, descendant_id)
            SELECT a, d FROM UNNEST($1::uuid[]) AS a CROSS JOIN UNNEST($2::uuid[]) AS d
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&new_ancestors)
        .bind(&subtree_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
