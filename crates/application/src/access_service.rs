//! Application service for access-control administration.

use std::collections::HashSet;
use std::sync::Arc;

use cadre_core::{AppError, AppResult, UserIdentity};
use cadre_domain::{
    AuditAction, MatrixDraft, Organization, OrganizationId, Permission, PermissionMatrix, Role,
    RoleId, RolePermissionEntry, Team,
};

use crate::access_ports::{AccessControlRepository, PermissionGrant};
use crate::audit_ports::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};

/// Result of a role-permission save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRolePermissions {
    /// The role's stored entry set after the request.
    pub entries: Vec<RolePermissionEntry>,
    /// Whether the request changed anything. An unchanged submission
    /// skips the write and the audit trail entirely.
    pub changed: bool,
}

/// Application service for the permission matrix and its surrounding
/// catalog.
#[derive(Clone)]
pub struct AccessControlService {
    repository: Arc<dyn AccessControlRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    audit_log_repository: Arc<dyn AuditLogRepository>,
}

impl AccessControlService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AccessControlRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        audit_log_repository: Arc<dyn AuditLogRepository>,
    ) -> Self {
        Self {
            repository,
            audit_repository,
            audit_log_repository,
        }
    }

    /// Returns all organizations.
    pub async fn list_organizations(&self) -> AppResult<Vec<Organization>> {
        self.repository.list_organizations().await
    }

    /// Returns teams, optionally scoped to one organization.
    pub async fn list_teams(
        &self,
        organization_id: Option<OrganizationId>,
    ) -> AppResult<Vec<Team>> {
        self.repository.list_teams(organization_id).await
    }

    /// Returns all roles, highest rank first.
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let mut roles = self.repository.list_roles().await?;
        roles.sort_by(|left, right| {
            right
                .rank
                .cmp(&left.rank)
                .then_with(|| left.name.cmp(&right.name))
        });
        Ok(roles)
    }

    /// Returns the permission catalog.
    pub async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.repository.list_permissions().await
    }

    /// Returns stored role-permission entries, optionally scoped to one
    /// role.
    pub async fn list_role_permissions(
        &self,
        role_id: Option<RoleId>,
    ) -> AppResult<Vec<RolePermissionEntry>> {
        self.repository.list_role_permissions(role_id).await
    }

    /// Saves a role's submitted permission list.
    ///
    /// The submission is applied on top of the stored snapshot with
    /// duplicate grants resolved last-write-wins. A read-only role is
    /// rejected before anything is loaded or written; unknown permission
    /// ids are rejected before the write. A submission that changes
    /// nothing is a no-op success without a write or an audit entry.
    pub async fn save_role_permissions(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        grants: Vec<PermissionGrant>,
    ) -> AppResult<SavedRolePermissions> {
        let role = self.require_role(role_id).await?;
        self.require_mutable(&role)?;

        let known: HashSet<_> = self
            .repository
            .list_permissions()
            .await?
            .into_iter()
            .map(|permission| permission.id)
            .collect();
        if let Some(unknown) = grants
            .iter()
            .find(|grant| !known.contains(&grant.permission_id))
        {
            return Err(AppError::Validation(format!(
                "unknown permission id '{}'",
                unknown.permission_id
            )));
        }

        let stored = self
            .repository
            .list_role_permissions(Some(role_id))
            .await?;
        let mut draft = MatrixDraft::from_snapshot(PermissionMatrix::from_entries(stored));

        for grant in &grants {
            draft.update(role_id, grant.permission_id, grant.granted);
        }

        if !draft.has_changes(role_id) {
            return Ok(SavedRolePermissions {
                entries: draft.extract(role_id),
                changed: false,
            });
        }

        let entries = draft.extract(role_id);
        self.repository
            .replace_role_permissions(role_id, &entries)
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::RolePermissionsSaved,
                resource_type: "role".to_owned(),
                resource_id: role_id.to_string(),
                detail: Some(format!(
                    "saved {} permission entries for role '{}'",
                    entries.len(),
                    role.name
                )),
            })
            .await?;

        Ok(SavedRolePermissions {
            entries,
            changed: true,
        })
    }

    /// Copies one role's entire permission set onto another.
    ///
    /// A full overwrite: permissions the destination held but the source
    /// lacks are revoked, never merged. A read-only destination is
    /// rejected before any repository access beyond the role lookups.
    pub async fn copy_role_permissions(
        &self,
        actor: &UserIdentity,
        source_role_id: RoleId,
        destination_role_id: RoleId,
    ) -> AppResult<Vec<RolePermissionEntry>> {
        if source_role_id == destination_role_id {
            return Err(AppError::Validation(
                "cannot copy a role's permissions onto itself".to_owned(),
            ));
        }

        let destination = self.require_role(destination_role_id).await?;
        self.require_mutable(&destination)?;
        let source = self.require_role(source_role_id).await?;

        let stored = self.repository.list_role_permissions(None).await?;
        let mut draft = MatrixDraft::from_snapshot(PermissionMatrix::from_entries(stored));
        draft.replace_role(source_role_id, destination_role_id);

        let entries = draft.extract(destination_role_id);
        self.repository
            .replace_role_permissions(destination_role_id, &entries)
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::RolePermissionsCopied,
                resource_type: "role".to_owned(),
                resource_id: destination_role_id.to_string(),
                detail: Some(format!(
                    "copied permissions from role '{}' onto role '{}'",
                    source.name, destination.name
                )),
            })
            .await?;

        Ok(entries)
    }

    /// Returns recent audit entries, newest first.
    pub async fn list_audit_log(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        self.audit_log_repository.list_recent_entries(query).await
    }

    async fn require_role(&self, role_id: RoleId) -> AppResult<Role> {
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))
    }

    fn require_mutable(&self, role: &Role) -> AppResult<()> {
        if role.is_read_only {
            return Err(AppError::Forbidden(format!(
                "role '{}' is read-only and cannot be modified",
                role.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use cadre_core::{AppError, AppResult, UserIdentity};
    use cadre_domain::{
        Organization, OrganizationId, Permission, PermissionAction, PermissionId, Role, RoleId,
        RolePermissionEntry, Team,
    };

    use crate::access_ports::{AccessControlRepository, PermissionGrant};
    use crate::audit_ports::{
        AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
    };

    use super::AccessControlService;

    fn role_id(n: u128) -> RoleId {
        RoleId::from_uuid(Uuid::from_u128(n))
    }

    fn permission_id(n: u128) -> PermissionId {
        PermissionId::from_uuid(Uuid::from_u128(n))
    }

    fn entry(role: RoleId, permission: PermissionId, granted: bool) -> RolePermissionEntry {
        RolePermissionEntry {
            role_id: role,
            permission_id: permission,
            granted,
        }
    }

    struct FakeAccessRepository {
        roles: Vec<Role>,
        permissions: Vec<Permission>,
        entries: Mutex<Vec<RolePermissionEntry>>,
        writes: Mutex<usize>,
    }

    impl FakeAccessRepository {
        fn new(
            roles: Vec<Role>,
            permissions: Vec<Permission>,
            entries: Vec<RolePermissionEntry>,
        ) -> Self {
            Self {
                roles,
                permissions,
                entries: Mutex::new(entries),
                writes: Mutex::new(0),
            }
        }

        async fn write_count(&self) -> usize {
            *self.writes.lock().await
        }

        async fn stored_entries(&self, role: RoleId) -> Vec<RolePermissionEntry> {
            self.entries
                .lock()
                .await
                .iter()
                .filter(|stored| stored.role_id == role)
                .copied()
                .collect()
        }
    }

    #[async_trait]
    impl AccessControlRepository for FakeAccessRepository {
        async fn list_organizations(&self) -> AppResult<Vec<Organization>> {
            Ok(Vec::new())
        }

        async fn list_teams(
            &self,
            _organization_id: Option<OrganizationId>,
        ) -> AppResult<Vec<Team>> {
            Ok(Vec::new())
        }

        async fn list_roles(&self) -> AppResult<Vec<Role>> {
            Ok(self.roles.clone())
        }

        async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
            Ok(self.roles.iter().find(|role| role.id == role_id).cloned())
        }

        async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
            Ok(self.permissions.clone())
        }

        async fn list_role_permissions(
            &self,
            role_id: Option<RoleId>,
        ) -> AppResult<Vec<RolePermissionEntry>> {
            let entries = self.entries.lock().await;
            Ok(entries
                .iter()
                .filter(|stored| role_id.is_none_or(|wanted| stored.role_id == wanted))
                .copied()
                .collect())
        }

        async fn replace_role_permissions(
            &self,
            role_id: RoleId,
            entries: &[RolePermissionEntry],
        ) -> AppResult<()> {
            *self.writes.lock().await += 1;
            let mut stored = self.entries.lock().await;
            stored.retain(|candidate| candidate.role_id != role_id);
            stored.extend_from_slice(entries);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeAuditRepository {
        events: Mutex<Vec<AuditEvent>>,
    }

    #[async_trait]
    impl AuditRepository for FakeAuditRepository {
        async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
            self.events.lock().await.push(event);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeAuditLogRepository;

    #[async_trait]
    impl AuditLogRepository for FakeAuditLogRepository {
        async fn list_recent_entries(
            &self,
            _query: AuditLogQuery,
        ) -> AppResult<Vec<AuditLogEntry>> {
            Ok(Vec::new())
        }
    }

    fn actor() -> UserIdentity {
        UserIdentity::new("alice", "Alice", None)
    }

    fn role(id: RoleId, name: &str, rank: i32, is_read_only: bool) -> Role {
        Role {
            id,
            name: name.to_owned(),
            description: String::new(),
            rank,
            is_read_only,
        }
    }

    fn permission(id: PermissionId, name: &str) -> Permission {
        Permission {
            id,
            name: name.to_owned(),
            description: String::new(),
            module: "campaign".to_owned(),
            action: PermissionAction::View,
        }
    }

    /// Reference scenario fixture: read-only admin with both grants, an
    /// editor holding view only.
    fn fixture() -> (
        Arc<FakeAccessRepository>,
        Arc<FakeAuditRepository>,
        AccessControlService,
    ) {
        let admin = role_id(1);
        let editor = role_id(2);
        let view = permission_id(10);
        let edit = permission_id(11);

        let repository = Arc::new(FakeAccessRepository::new(
            vec![
                role(admin, "admin", 100, true),
                role(editor, "editor", 50, false),
            ],
            vec![permission(view, "View"), permission(edit, "Edit")],
            vec![
                entry(admin, view, true),
                entry(admin, edit, true),
                entry(editor, view, true),
                entry(editor, edit, false),
            ],
        ));
        let audit_repository = Arc::new(FakeAuditRepository::default());
        let service = AccessControlService::new(
            repository.clone(),
            audit_repository.clone(),
            Arc::new(FakeAuditLogRepository),
        );

        (repository, audit_repository, service)
    }

    #[tokio::test]
    async fn roles_are_listed_highest_rank_first() {
        let (_, _, service) = fixture();

        let roles = service.list_roles().await.unwrap_or_default();

        let names: Vec<_> = roles.iter().map(|role| role.name.as_str()).collect();
        assert_eq!(names, vec!["admin", "editor"]);
    }

    #[tokio::test]
    async fn save_rejects_read_only_role_before_any_write() {
        let (repository, audit_repository, service) = fixture();

        let result = service
            .save_role_permissions(
                &actor(),
                role_id(1),
                vec![PermissionGrant {
                    permission_id: permission_id(10),
                    granted: false,
                }],
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(repository.write_count().await, 0);
        assert!(audit_repository.events.lock().await.is_empty());
    }

    #[tokio::test]
    async fn save_rejects_unknown_permission_id() {
        let (repository, _, service) = fixture();

        let result = service
            .save_role_permissions(
                &actor(),
                role_id(2),
                vec![PermissionGrant {
                    permission_id: permission_id(99),
                    granted: true,
                }],
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(repository.write_count().await, 0);
    }

    #[tokio::test]
    async fn save_rejects_unknown_role() {
        let (_, _, service) = fixture();

        let result = service
            .save_role_permissions(&actor(), role_id(99), Vec::new())
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn unchanged_submission_skips_write_and_audit() {
        let (repository, audit_repository, service) = fixture();

        let result = service
            .save_role_permissions(
                &actor(),
                role_id(2),
                vec![
                    PermissionGrant {
                        permission_id: permission_id(10),
                        granted: true,
                    },
                    PermissionGrant {
                        permission_id: permission_id(11),
                        granted: false,
                    },
                ],
            )
            .await;

        assert!(result.is_ok_and(|saved| !saved.changed));
        assert_eq!(repository.write_count().await, 0);
        assert!(audit_repository.events.lock().await.is_empty());
    }

    #[tokio::test]
    async fn duplicate_grants_resolve_last_write_wins() {
        let (repository, _, service) = fixture();

        let result = service
            .save_role_permissions(
                &actor(),
                role_id(2),
                vec![
                    PermissionGrant {
                        permission_id: permission_id(11),
                        granted: true,
                    },
                    PermissionGrant {
                        permission_id: permission_id(11),
                        granted: false,
                    },
                    PermissionGrant {
                        permission_id: permission_id(11),
                        granted: true,
                    },
                ],
            )
            .await;

        assert!(result.is_ok_and(|saved| saved.changed));
        let stored = repository.stored_entries(role_id(2)).await;
        assert!(
            stored
                .iter()
                .any(|entry| entry.permission_id == permission_id(11) && entry.granted)
        );
    }

    #[tokio::test]
    async fn real_save_persists_and_audits() {
        let (repository, audit_repository, service) = fixture();

        let result = service
            .save_role_permissions(
                &actor(),
                role_id(2),
                vec![PermissionGrant {
                    permission_id: permission_id(11),
                    granted: true,
                }],
            )
            .await;

        assert!(result.is_ok_and(|saved| saved.changed));
        assert_eq!(repository.write_count().await, 1);
        assert_eq!(audit_repository.events.lock().await.len(), 1);

        let stored = repository.stored_entries(role_id(2)).await;
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn copy_overwrites_destination_including_revocations() {
        let editor = role_id(2);
        let reviewer = role_id(3);

        // The destination role holds a grant the source lacks.
        let repository = Arc::new(FakeAccessRepository::new(
            vec![
                role(editor, "editor", 50, false),
                role(reviewer, "reviewer", 10, false),
            ],
            vec![
                permission(permission_id(10), "View"),
                permission(permission_id(11), "Edit"),
            ],
            vec![
                entry(editor, permission_id(10), true),
                entry(reviewer, permission_id(11), true),
            ],
        ));
        let service = AccessControlService::new(
            repository.clone(),
            Arc::new(FakeAuditRepository::default()),
            Arc::new(FakeAuditLogRepository),
        );

        let result = service
            .copy_role_permissions(&actor(), editor, reviewer)
            .await;

        assert!(result.is_ok());
        let stored = repository.stored_entries(reviewer).await;
        assert_eq!(stored.len(), 1);
        assert!(
            stored
                .iter()
                .all(|entry| entry.permission_id == permission_id(10) && entry.granted)
        );
    }

    #[tokio::test]
    async fn copy_into_read_only_role_is_rejected_without_writes() {
        let (repository, audit_repository, service) = fixture();

        let result = service
            .copy_role_permissions(&actor(), role_id(2), role_id(1))
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(repository.write_count().await, 0);
        assert!(audit_repository.events.lock().await.is_empty());

        // The read-only role keeps its grants.
        let stored = repository.stored_entries(role_id(1)).await;
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|entry| entry.granted));
    }

    #[tokio::test]
    async fn copy_onto_itself_is_rejected() {
        let (_, _, service) = fixture();

        let result = service
            .copy_role_permissions(&actor(), role_id(2), role_id(2))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
