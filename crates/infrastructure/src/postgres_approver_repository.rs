//! Postgres adapter for the module approver repository port.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use cadre_application::{ApproverRepository, ApproverUserFilter};
use cadre_core::{AppError, AppResult};
use cadre_domain::{ApproverUser, ModuleDefinition, OrganizationId, TeamId};

/// Approver repository backed by Postgres.
///
/// Approver candidates are user accounts carrying an organization and a
/// team assignment; accounts without one never show up as candidates.
#[derive(Clone)]
pub struct PostgresApproverRepository {
    pool: PgPool,
}

impl PostgresApproverRepository {
    /// Creates a repository over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ModuleRow {
    id: String,
    name: String,
    description: String,
    requires_approval: bool,
}

#[derive(sqlx::FromRow)]
struct ApproverUserRow {
    id: Uuid,
    display_name: String,
    email: String,
    avatar_url: Option<String>,
    organization_id: Uuid,
    team_id: Uuid,
}

impl From<ModuleRow> for ModuleDefinition {
    fn from(row: ModuleRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            requires_approval: row.requires_approval,
        }
    }
}

impl From<ApproverUserRow> for ApproverUser {
    fn from(row: ApproverUserRow) -> Self {
        Self {
            id: row.id,
            name: row.display_name,
            email: row.email,
            avatar_url: row.avatar_url,
            organization_id: OrganizationId::from_uuid(row.organization_id),
            team_id: TeamId::from_uuid(row.team_id),
        }
    }
}

#[async_trait]
impl ApproverRepository for PostgresApproverRepository {
    async fn list_modules(&self) -> AppResult<Vec<ModuleDefinition>> {
        let rows = sqlx::query_as::<_, ModuleRow>(
            r#"
            SELECT id, name, description, requires_approval
            FROM modules
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list modules: {error}")))?;

        Ok(rows.into_iter().map(ModuleDefinition::from).collect())
    }

    async fn find_module(&self, module_id: &str) -> AppResult<Option<ModuleDefinition>> {
        let row = sqlx::query_as::<_, ModuleRow>(
            r#"
            SELECT id, name, description, requires_approval
            FROM modules
            WHERE id = $1
            "#,
        )
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve module: {error}")))?;

        Ok(row.map(ModuleDefinition::from))
    }

    async fn list_approver_users(
        &self,
        filter: ApproverUserFilter,
    ) -> AppResult<Vec<ApproverUser>> {
        let rows = sqlx::query_as::<_, ApproverUserRow>(
            r#"
            SELECT id, display_name, email, avatar_url, organization_id, team_id
            FROM users
            WHERE organization_id IS NOT NULL
                AND team_id IS NOT NULL
                AND ($1::uuid IS NULL OR organization_id = $1)
                AND ($2::uuid IS NULL OR team_id = $2)
            ORDER BY display_name
            "#,
        )
        .bind(filter.organization_id.map(|id| id.as_uuid()))
        .bind(filter.team_id.map(|id| id.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list approver users: {error}")))?;

        Ok(rows.into_iter().map(ApproverUser::from).collect())
    }

    async fn find_users_by_ids(&self, user_ids: &[Uuid]) -> AppResult<Vec<ApproverUser>> {
        let rows = sqlx::query_as::<_, ApproverUserRow>(
            r#"
            SELECT id, display_name, email, avatar_url, organization_id, team_id
            FROM users
            WHERE organization_id IS NOT NULL
                AND team_id IS NOT NULL
                AND id = ANY($1)
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve approver users: {error}")))?;

        Ok(rows.into_iter().map(ApproverUser::from).collect())
    }

    async fn approvers_for_module(&self, module_id: &str) -> AppResult<Vec<ApproverUser>> {
        let rows = sqlx::query_as::<_, ApproverUserRow>(
            r#"
            SELECT users.id, users.display_name, users.email, users.avatar_url,
                users.organization_id, users.team_id
            FROM module_approvers
            JOIN users ON users.id = module_approvers.user_id
            WHERE module_approvers.module_id = $1
                AND users.organization_id IS NOT NULL
                AND users.team_id IS NOT NULL
            ORDER BY users.display_name
            "#,
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list module approvers: {error}")))?;

        Ok(rows.into_iter().map(ApproverUser::from).collect())
    }

    async fn replace_module_approvers(
        &self,
        module_id: &str,
        user_ids: &[Uuid],
    ) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        sqlx::query(
            r#"
            DELETE FROM module_approvers
            WHERE module_id = $1
            "#,
        )
        .bind(module_id)
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to clear module approvers: {error}"))
        })?;

        for user_id in user_ids {
            sqlx::query(
                r#"
                INSERT INTO module_approvers (module_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT (module_id, user_id) DO NOTHING
                "#,
            )
            .bind(module_id)
            .bind(user_id)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to persist module approvers: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })
    }
}
