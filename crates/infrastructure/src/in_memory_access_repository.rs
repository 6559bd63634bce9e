//! In-memory access-control repository.
//!
//! The development "mock data" backing: the API can serve the permission
//! administration screens from seeded fixture rows without a database.
//! Also serves as a test double wherever a real store is overkill.

use async_trait::async_trait;
use tokio::sync::RwLock;

use cadre_application::AccessControlRepository;
use cadre_core::AppResult;
use cadre_domain::{
    Organization, OrganizationId, Permission, PermissionMatrix, Role, RoleId,
    RolePermissionEntry, Team,
};

use crate::fixtures;

/// Access-control repository held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryAccessRepository {
    organizations: RwLock<Vec<Organization>>,
    teams: RwLock<Vec<Team>>,
    roles: RwLock<Vec<Role>>,
    permissions: RwLock<Vec<Permission>>,
    entries: RwLock<Vec<RolePermissionEntry>>,
}

impl InMemoryAccessRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with the development fixture data.
    #[must_use]
    pub fn with_fixture_data() -> Self {
        Self {
            organizations: RwLock::new(fixtures::organizations()),
            teams: RwLock::new(fixtures::teams()),
            roles: RwLock::new(fixtures::roles()),
            permissions: RwLock::new(fixtures::permissions()),
            entries: RwLock::new(fixtures::role_permissions()),
        }
    }
}

#[async_trait]
impl AccessControlRepository for InMemoryAccessRepository {
    async fn list_organizations(&self) -> AppResult<Vec<Organization>> {
        Ok(self.organizations.read().await.clone())
    }

    async fn list_teams(&self, organization_id: Option<OrganizationId>) -> AppResult<Vec<Team>> {
        let teams = self.teams.read().await;
        Ok(teams
            .iter()
            .filter(|team| {
                organization_id.is_none_or(|wanted| team.organization_id == wanted)
            })
            .cloned()
            .collect())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.read().await.clone())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .read()
            .await
            .iter()
            .find(|role| role.id == role_id)
            .cloned())
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(self.permissions.read().await.clone())
    }

    async fn list_role_permissions(
        &self,
        role_id: Option<RoleId>,
    ) -> AppResult<Vec<RolePermissionEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|entry| role_id.is_none_or(|wanted| entry.role_id == wanted))
            .copied()
            .collect())
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        entries: &[RolePermissionEntry],
    ) -> AppResult<()> {
        let mut stored = self.entries.write().await;
        stored.retain(|entry| entry.role_id != role_id);
        // Normalize any duplicates the same way a rebuild would.
        let normalized = PermissionMatrix::from_entries(entries.iter().copied());
        stored.extend(normalized.role_entries(role_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cadre_application::AccessControlRepository;
    use cadre_domain::RolePermissionEntry;

    use crate::fixtures;

    use super::InMemoryAccessRepository;

    #[tokio::test]
    async fn fixture_repository_serves_the_seeded_catalog() {
        let repository = InMemoryAccessRepository::with_fixture_data();

        let roles = repository.list_roles().await.unwrap_or_default();
        let permissions = repository.list_permissions().await.unwrap_or_default();

        assert_eq!(roles.len(), 6);
        assert_eq!(permissions.len(), 20);
        assert!(roles.iter().any(|role| role.is_read_only));
    }

    #[tokio::test]
    async fn team_listing_filters_by_organization() {
        let repository = InMemoryAccessRepository::with_fixture_data();

        let organizations = repository.list_organizations().await.unwrap_or_default();
        let all_teams = repository.list_teams(None).await.unwrap_or_default();
        let scoped = repository
            .list_teams(organizations.first().map(|organization| organization.id))
            .await
            .unwrap_or_default();

        assert_eq!(all_teams.len(), 6);
        assert_eq!(scoped.len(), 3);
    }

    #[tokio::test]
    async fn replace_clears_previous_entries_for_the_role() {
        let repository = InMemoryAccessRepository::with_fixture_data();
        let role_id = fixtures::role_id(6);
        let permission_id = fixtures::permission_id(1, 1);

        let result = repository
            .replace_role_permissions(
                role_id,
                &[RolePermissionEntry {
                    role_id,
                    permission_id,
                    granted: true,
                }],
            )
            .await;
        assert!(result.is_ok());

        let stored = repository
            .list_role_permissions(Some(role_id))
            .await
            .unwrap_or_default();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].permission_id, permission_id);
    }
}
