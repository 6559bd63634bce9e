//! Postgres adapter for the access-control repository port.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;

use cadre_application::AccessControlRepository;
use cadre_core::{AppError, AppResult};
use cadre_domain::{
    Organization, OrganizationId, Permission, PermissionAction, PermissionId, Role, RoleId,
    RolePermissionEntry, Team, TeamId,
};

/// Access-control repository backed by Postgres.
#[derive(Clone)]
pub struct PostgresAccessRepository {
    pool: PgPool,
}

impl PostgresAccessRepository {
    /// Creates a repository over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrganizationRow {
    id: uuid::Uuid,
    name: String,
}

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: uuid::Uuid,
    name: String,
    organization_id: uuid::Uuid,
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: uuid::Uuid,
    name: String,
    description: String,
    rank: i32,
    is_read_only: bool,
}

#[derive(sqlx::FromRow)]
struct PermissionRow {
    id: uuid::Uuid,
    name: String,
    description: String,
    module: String,
    action: String,
}

#[derive(sqlx::FromRow)]
struct RolePermissionRow {
    role_id: uuid::Uuid,
    permission_id: uuid::Uuid,
    granted: bool,
}

impl TryFrom<PermissionRow> for Permission {
    type Error = AppError;

    fn try_from(row: PermissionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PermissionId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            module: row.module,
            action: PermissionAction::from_str(row.action.as_str())?,
        })
    }
}

#[async_trait]
impl AccessControlRepository for PostgresAccessRepository {
    async fn list_organizations(&self) -> AppResult<Vec<Organization>> {
        let rows = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, name
            FROM organizations
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list organizations: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| Organization {
                id: OrganizationId::from_uuid(row.id),
                name: row.name,
            })
            .collect())
    }

    async fn list_teams(&self, organization_id: Option<OrganizationId>) -> AppResult<Vec<Team>> {
        let rows = match organization_id {
            Some(organization_id) => {
                sqlx::query_as::<_, TeamRow>(
                    r#"
                    SELECT id, name, organization_id
                    FROM teams
                    WHERE organization_id = $1
                    ORDER BY name
                    "#,
                )
                .bind(organization_id.as_uuid())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, TeamRow>(
                    r#"
                    SELECT id, name, organization_id
                    FROM teams
                    ORDER BY name
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|error| AppError::Internal(format!("failed to list teams: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| Team {
                id: TeamId::from_uuid(row.id),
                name: row.name,
                organization_id: OrganizationId::from_uuid(row.organization_id),
            })
            .collect())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, rank, is_read_only
            FROM roles
            ORDER BY rank DESC, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        Ok(rows.into_iter().map(role_from_row).collect())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, rank, is_read_only
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve role: {error}")))?;

        Ok(row.map(role_from_row))
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, description, module, action
            FROM permissions
            ORDER BY module, action
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        rows.into_iter().map(Permission::try_from).collect()
    }

    async fn list_role_permissions(
        &self,
        role_id: Option<RoleId>,
    ) -> AppResult<Vec<RolePermissionEntry>> {
        let rows = match role_id {
            Some(role_id) => {
                sqlx::query_as::<_, RolePermissionRow>(
                    r#"
                    SELECT role_id, permission_id, granted
                    FROM role_permissions
                    WHERE role_id = $1
                    "#,
                )
                .bind(role_id.as_uuid())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, RolePermissionRow>(
                    r#"
                    SELECT role_id, permission_id, granted
                    FROM role_permissions
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|error| {
            AppError::Internal(format!("failed to list role permissions: {error}"))
        })?;

        Ok(rows
            .into_iter()
            .map(|row| RolePermissionEntry {
                role_id: RoleId::from_uuid(row.role_id),
                permission_id: PermissionId::from_uuid(row.permission_id),
                granted: row.granted,
            })
            .collect())
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        entries: &[RolePermissionEntry],
    ) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        sqlx::query(
            r#"
            DELETE FROM role_permissions
            WHERE role_id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to clear role permissions: {error}"))
        })?;

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO role_permissions (role_id, permission_id, granted)
                VALUES ($1, $2, $3)
                ON CONFLICT (role_id, permission_id) DO UPDATE SET granted = EXCLUDED.granted
                "#,
            )
            .bind(role_id.as_uuid())
            .bind(entry.permission_id.as_uuid())
            .bind(entry.granted)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to persist role permissions: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })
    }
}

fn role_from_row(row: RoleRow) -> Role {
    Role {
        id: RoleId::from_uuid(row.id),
        name: row.name,
        description: row.description,
        rank: row.rank,
        is_read_only: row.is_read_only,
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use sqlx::migrate::Migrator;
    use sqlx::postgres::PgPoolOptions;
    use uuid::Uuid;

    use cadre_application::AccessControlRepository;
    use cadre_domain::{PermissionId, RoleId, RolePermissionEntry};

    use super::PostgresAccessRepository;

    static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

    async fn test_pool() -> Option<PgPool> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            return None;
        };

        let pool = match PgPoolOptions::new()
            .max_connections(2)
            .connect(database_url.as_str())
            .await
        {
            Ok(pool) => pool,
            Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
        };

        if let Err(error) = MIGRATOR.run(&pool).await {
            panic!("failed to run migrations for access repository tests: {error}");
        }

        Some(pool)
    }

    async fn seed_role(pool: &PgPool, name: &str, is_read_only: bool) -> RoleId {
        let role_id = Uuid::new_v4();
        let insert = sqlx::query(
            r#"
            INSERT INTO roles (id, name, description, rank, is_read_only)
            VALUES ($1, $2, '', 10, $3)
            "#,
        )
        .bind(role_id)
        .bind(name)
        .bind(is_read_only)
        .execute(pool)
        .await;
        assert!(insert.is_ok());
        RoleId::from_uuid(role_id)
    }

    async fn seed_permission(pool: &PgPool, module: &str, action: &str) -> PermissionId {
        let permission_id = Uuid::new_v4();
        let insert = sqlx::query(
            r#"
            INSERT INTO permissions (id, name, description, module, action)
            VALUES ($1, $2, '', $3, $4)
            "#,
        )
        .bind(permission_id)
        .bind(format!("{module} {action}"))
        .bind(module)
        .bind(action)
        .execute(pool)
        .await;
        assert!(insert.is_ok());
        PermissionId::from_uuid(permission_id)
    }

    #[tokio::test]
    async fn replace_role_permissions_is_wholesale() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repository = PostgresAccessRepository::new(pool.clone());

        let suffix = Uuid::new_v4();
        let role_id = seed_role(&pool, &format!("editor-{suffix}"), false).await;
        let view = seed_permission(&pool, &format!("mod-{suffix}"), "view").await;
        let edit = seed_permission(&pool, &format!("mod-{suffix}"), "edit").await;

        let entry = |permission_id, granted| RolePermissionEntry {
            role_id,
            permission_id,
            granted,
        };

        let first = repository
            .replace_role_permissions(role_id, &[entry(view, true), entry(edit, true)])
            .await;
        assert!(first.is_ok());

        let second = repository
            .replace_role_permissions(role_id, &[entry(edit, false)])
            .await;
        assert!(second.is_ok());

        let stored = repository
            .list_role_permissions(Some(role_id))
            .await
            .unwrap_or_default();
        assert_eq!(stored.len(), 1);
        assert!(
            stored
                .iter()
                .all(|stored| stored.permission_id == edit && !stored.granted)
        );
    }
}
