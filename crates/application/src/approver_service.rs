//! Application service for module approver administration.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use cadre_core::{AppError, AppResult, UserIdentity};
use cadre_domain::{ApproverUser, AuditAction, ModuleDefinition};

use crate::approver_ports::{ApproverRepository, ApproverUserFilter};
use crate::audit_ports::{AuditEvent, AuditRepository};

/// Application service for binding approver sets to modules.
///
/// Approver sets carry none of the matrix's diffing machinery: every save
/// replaces the module's set wholesale.
#[derive(Clone)]
pub struct ApproverService {
    repository: Arc<dyn ApproverRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl ApproverService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn ApproverRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            repository,
            audit_repository,
        }
    }

    /// Returns all modules.
    pub async fn list_modules(&self) -> AppResult<Vec<ModuleDefinition>> {
        self.repository.list_modules().await
    }

    /// Returns approver candidates, optionally scoped by organization and
    /// team.
    pub async fn list_approver_users(
        &self,
        filter: ApproverUserFilter,
    ) -> AppResult<Vec<ApproverUser>> {
        self.repository.list_approver_users(filter).await
    }

    /// Returns the approver set bound to a module.
    pub async fn module_approvers(&self, module_id: &str) -> AppResult<Vec<ApproverUser>> {
        self.require_module(module_id).await?;
        self.repository.approvers_for_module(module_id).await
    }

    /// Replaces a module's approver set wholesale and returns the new set.
    ///
    /// Duplicated ids in the submission collapse to one; unknown user ids
    /// are rejected before the write.
    pub async fn replace_module_approvers(
        &self,
        actor: &UserIdentity,
        module_id: &str,
        user_ids: Vec<Uuid>,
    ) -> AppResult<Vec<ApproverUser>> {
        let module = self.require_module(module_id).await?;

        let mut seen = HashSet::new();
        let deduplicated: Vec<Uuid> = user_ids
            .into_iter()
            .filter(|user_id| seen.insert(*user_id))
            .collect();

        let resolved = self.repository.find_users_by_ids(&deduplicated).await?;
        if resolved.len() != deduplicated.len() {
            let known: HashSet<_> = resolved.iter().map(|user| user.id).collect();
            let missing = deduplicated
                .iter()
                .find(|user_id| !known.contains(user_id))
                .map(Uuid::to_string)
                .unwrap_or_default();
            return Err(AppError::Validation(format!(
                "unknown approver user id '{missing}'"
            )));
        }

        self.repository
            .replace_module_approvers(module_id, &deduplicated)
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::ModuleApproversReplaced,
                resource_type: "module".to_owned(),
                resource_id: module.id.clone(),
                detail: Some(format!(
                    "bound {} approvers to module '{}'",
                    deduplicated.len(),
                    module.name
                )),
            })
            .await?;

        self.repository.approvers_for_module(module_id).await
    }

    async fn require_module(&self, module_id: &str) -> AppResult<ModuleDefinition> {
        self.repository
            .find_module(module_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("module '{module_id}' was not found")))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use cadre_core::{AppError, AppResult, UserIdentity};
    use cadre_domain::{ApproverUser, ModuleDefinition, OrganizationId, TeamId};

    use crate::approver_ports::{ApproverRepository, ApproverUserFilter};
    use crate::audit_ports::{AuditEvent, AuditRepository};

    use super::ApproverService;

    struct FakeApproverRepository {
        modules: Vec<ModuleDefinition>,
        users: Vec<ApproverUser>,
        bindings: Mutex<Vec<Uuid>>,
    }

    #[async_trait]
    impl ApproverRepository for FakeApproverRepository {
        async fn list_modules(&self) -> AppResult<Vec<ModuleDefinition>> {
            Ok(self.modules.clone())
        }

        async fn find_module(&self, module_id: &str) -> AppResult<Option<ModuleDefinition>> {
            Ok(self
                .modules
                .iter()
                .find(|module| module.id == module_id)
                .cloned())
        }

        async fn list_approver_users(
            &self,
            _filter: ApproverUserFilter,
        ) -> AppResult<Vec<ApproverUser>> {
            Ok(self.users.clone())
        }

        async fn find_users_by_ids(&self, user_ids: &[Uuid]) -> AppResult<Vec<ApproverUser>> {
            Ok(self
                .users
                .iter()
                .filter(|user| user_ids.contains(&user.id))
                .cloned()
                .collect())
        }

        async fn approvers_for_module(&self, _module_id: &str) -> AppResult<Vec<ApproverUser>> {
            let bindings = self.bindings.lock().await;
            Ok(self
                .users
                .iter()
                .filter(|user| bindings.contains(&user.id))
                .cloned()
                .collect())
        }

        async fn replace_module_approvers(
            &self,
            _module_id: &str,
            user_ids: &[Uuid],
        ) -> AppResult<()> {
            *self.bindings.lock().await = user_ids.to_vec();
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

    fn user(id: Uuid, name: &str) -> ApproverUser {
        ApproverUser {
            id,
            name: name.to_owned(),
            email: format!("{name}@example.com"),
            avatar_url: None,
            organization_id: OrganizationId::from_uuid(Uuid::from_u128(500)),
            team_id: TeamId::from_uuid(Uuid::from_u128(600)),
        }
    }

    fn fixture(existing: Vec<Uuid>) -> (Arc<FakeApproverRepository>, ApproverService) {
        let repository = Arc::new(FakeApproverRepository {
            modules: vec![ModuleDefinition {
                id: "asset_management".to_owned(),
                name: "Asset Management".to_owned(),
                description: String::new(),
                requires_approval: true,
            }],
            users: vec![
                user(Uuid::from_u128(1), "ana"),
                user(Uuid::from_u128(2), "bruno"),
            ],
            bindings: Mutex::new(existing),
        });
        let service = ApproverService::new(
            repository.clone(),
            Arc::new(FakeAuditRepository::default()),
        );
        (repository, service)
    }

    fn actor() -> UserIdentity {
        UserIdentity::new("alice", "Alice", None)
    }

    #[tokio::test]
    async fn replace_overwrites_previous_set() {
        let (repository, service) = fixture(vec![Uuid::from_u128(1)]);

        let result = service
            .replace_module_approvers(&actor(), "asset_management", vec![Uuid::from_u128(2)])
            .await;

        assert!(result.is_ok_and(|approvers| {
            approvers.len() == 1 && approvers[0].id == Uuid::from_u128(2)
        }));
        assert_eq!(*repository.bindings.lock().await, vec![Uuid::from_u128(2)]);
    }

    #[tokio::test]
    async fn duplicate_ids_collapse_to_one() {
        let (repository, service) = fixture(Vec::new());

        let result = service
            .replace_module_approvers(
                &actor(),
                "asset_management",
                vec![Uuid::from_u128(1), Uuid::from_u128(1)],
            )
            .await;

        assert!(result.is_ok());
        assert_eq!(repository.bindings.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_user_id_is_rejected_without_write() {
        let (repository, service) = fixture(vec![Uuid::from_u128(1)]);

        let result = service
            .replace_module_approvers(&actor(), "asset_management", vec![Uuid::from_u128(9)])
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(*repository.bindings.lock().await, vec![Uuid::from_u128(1)]);
    }

    #[tokio::test]
    async fn unknown_module_is_not_found() {
        let (_, service) = fixture(Vec::new());

        let result = service.module_approvers("billing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
