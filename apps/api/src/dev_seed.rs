//! Development data seeding.
//!
//! Loads the fixture catalog, demo accounts and a couple of campaigns so
//! a fresh database serves the same data the in-memory fallback does.
//! Idempotent: reseeding an already-seeded database changes nothing.

use cadre_application::PasswordHasher;
use cadre_core::{AppError, AppResult};
use cadre_infrastructure::{Argon2PasswordHasher, fixtures};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

const DEV_ADMIN_EMAIL: &str = "admin@cadre.local";
const DEV_ADMIN_PASSWORD: &str = "local admin passphrase";

/// Demo approver candidates: (id offset, name, email, team fixture index).
const DEV_USERS: &[(u128, &str, &str, usize)] = &[
    (1, "Ana Silva", "ana@cadre.local", 0),
    (2, "Bruno Costa", "bruno@cadre.local", 1),
    (3, "Carla Mendes", "carla@cadre.local", 2),
    (4, "Diego Rocha", "diego@cadre.local", 3),
];

pub async fn run(pool: &PgPool) -> AppResult<()> {
    seed_catalog(pool).await?;
    seed_users(pool).await?;
    seed_campaigns(pool).await?;

    info!("development seed data applied");
    Ok(())
}

async fn seed_catalog(pool: &PgPool) -> AppResult<()> {
    for organization in fixtures::organizations() {
        sqlx::query(
            r#"
            INSERT INTO organizations (id, name)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(organization.id.as_uuid())
        .bind(organization.name.as_str())
        .execute(pool)
        .await
        .map_err(seed_error)?;
    }

    for team in fixtures::teams() {
        sqlx::query(
            r#"
            INSERT INTO teams (id, organization_id, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(team.id.as_uuid())
        .bind(team.organization_id.as_uuid())
        .bind(team.name.as_str())
        .execute(pool)
        .await
        .map_err(seed_error)?;
    }

    for role in fixtures::roles() {
        sqlx::query(
            r#"
            INSERT INTO roles (id, name, description, rank, is_read_only)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(role.id.as_uuid())
        .bind(role.name.as_str())
        .bind(role.description.as_str())
        .bind(role.rank)
        .bind(role.is_read_only)
        .execute(pool)
        .await
        .map_err(seed_error)?;
    }

    for permission in fixtures::permissions() {
        sqlx::query(
            r#"
            INSERT INTO permissions (id, name, description, module, action)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(permission.id.as_uuid())
        .bind(permission.name.as_str())
        .bind(permission.description.as_str())
        .bind(permission.module.as_str())
        .bind(permission.action.as_str())
        .execute(pool)
        .await
        .map_err(seed_error)?;
    }

    for entry in fixtures::role_permissions() {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id, granted)
            VALUES ($1, $2, $3)
            ON CONFLICT (role_id, permission_id) DO NOTHING
            "#,
        )
        .bind(entry.role_id.as_uuid())
        .bind(entry.permission_id.as_uuid())
        .bind(entry.granted)
        .execute(pool)
        .await
        .map_err(seed_error)?;
    }

    for module in fixtures::modules() {
        sqlx::query(
            r#"
            INSERT INTO modules (id, name, description, requires_approval)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(module.id.as_str())
        .bind(module.name.as_str())
        .bind(module.description.as_str())
        .bind(module.requires_approval)
        .execute(pool)
        .await
        .map_err(seed_error)?;
    }

    Ok(())
}

async fn seed_users(pool: &PgPool) -> AppResult<()> {
    let hasher = Argon2PasswordHasher::new();
    let password_hash = hasher.hash_password(DEV_ADMIN_PASSWORD)?;

    sqlx::query(
        r#"
        INSERT INTO users (id, email, display_name, password_hash, email_verified)
        VALUES ($1, $2, 'Cadre Admin', $3, true)
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(Uuid::from_u128(0x0E00))
    .bind(DEV_ADMIN_EMAIL)
    .bind(password_hash.as_str())
    .execute(pool)
    .await
    .map_err(seed_error)?;

    let teams = fixtures::teams();
    for (offset, name, email, team_index) in DEV_USERS {
        let Some(team) = teams.get(*team_index) else {
            continue;
        };

        // Demo candidates share the admin passphrase; they exist for the
        // approver pickers, not for signing in.
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, display_name, password_hash, email_verified,
                organization_id, team_id
            )
            VALUES ($1, $2, $3, $4, true, $5, $6)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(Uuid::from_u128(0x0E00 + offset))
        .bind(*email)
        .bind(*name)
        .bind(password_hash.as_str())
        .bind(team.organization_id.as_uuid())
        .bind(team.id.as_uuid())
        .execute(pool)
        .await
        .map_err(seed_error)?;
    }

    // Bind the first two candidates to the asset module as approvers.
    for offset in [1u128, 2] {
        sqlx::query(
            r#"
            INSERT INTO module_approvers (module_id, user_id)
            VALUES ('asset_management', $1)
            ON CONFLICT (module_id, user_id) DO NOTHING
            "#,
        )
        .bind(Uuid::from_u128(0x0E00 + offset))
        .execute(pool)
        .await
        .map_err(seed_error)?;
    }

    Ok(())
}

async fn seed_campaigns(pool: &PgPool) -> AppResult<()> {
    let now = Utc::now();
    let campaigns = [
        (
            Uuid::from_u128(0x0F01),
            "Spring Product Launch",
            "digital_display",
            "active",
            Decimal::new(50_000, 0),
        ),
        (
            Uuid::from_u128(0x0F02),
            "Brand Awareness Q3",
            "social_media",
            "draft",
            Decimal::new(20_000, 0),
        ),
    ];

    for (id, name, campaign_type, status, budget) in campaigns {
        sqlx::query(
            r#"
            INSERT INTO campaigns (
                id, name, description, campaign_type, status, budget, spent_amount,
                start_date, end_date, owner_subject, created_at, updated_at
            )
            VALUES ($1, $2, '', $3, $4, $5, 0, $6, $7, $8, $9, $9)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(campaign_type)
        .bind(status)
        .bind(budget)
        .bind(now)
        .bind(now + Duration::days(60))
        .bind(Uuid::from_u128(0x0E00).to_string())
        .bind(now)
        .execute(pool)
        .await
        .map_err(seed_error)?;
    }

    Ok(())
}

fn seed_error(error: sqlx::Error) -> AppError {
    AppError::Internal(format!("failed to apply seed data: {error}"))
}
