//! Development fixture data for the access-control catalog.
//!
//! Identifiers are deterministic so reseeding a database or rebuilding an
//! in-memory repository always produces the same rows.

use uuid::Uuid;

use cadre_domain::{
    ModuleDefinition, Organization, OrganizationId, Permission, PermissionAction, PermissionId,
    Role, RoleId, RolePermissionEntry, Team, TeamId,
};

fn organization_id(n: u128) -> OrganizationId {
    OrganizationId::from_uuid(Uuid::from_u128(0x0A00 + n))
}

fn team_id(n: u128) -> TeamId {
    TeamId::from_uuid(Uuid::from_u128(0x0B00 + n))
}

/// Deterministic role id for fixture row `n`.
#[must_use]
pub fn role_id(n: u128) -> RoleId {
    RoleId::from_uuid(Uuid::from_u128(0x0C00 + n))
}

/// Deterministic permission id for module `m`, action `a`.
#[must_use]
pub fn permission_id(m: u128, a: u128) -> PermissionId {
    PermissionId::from_uuid(Uuid::from_u128(0x0D00 + m * 0x10 + a))
}

/// Fixture organizations.
#[must_use]
pub fn organizations() -> Vec<Organization> {
    [(1, "ACME Corp"), (2, "Beta Inc"), (3, "Gamma LLC")]
        .into_iter()
        .map(|(n, name)| Organization {
            id: organization_id(n),
            name: name.to_owned(),
        })
        .collect()
}

/// Fixture teams.
#[must_use]
pub fn teams() -> Vec<Team> {
    [
        (1, "Regional team - SG", 1),
        (2, "Marketing team", 1),
        (3, "Sales team", 1),
        (4, "Development team", 2),
        (5, "Design team", 2),
        (6, "Operations team", 3),
    ]
    .into_iter()
    .map(|(n, name, organization)| Team {
        id: team_id(n),
        name: name.to_owned(),
        organization_id: organization_id(organization),
    })
    .collect()
}

/// Fixture roles. The Super Admin role is read-only: its grants cannot be
/// edited or overwritten.
#[must_use]
pub fn roles() -> Vec<Role> {
    [
        (1, "Super Admin", "Full system access with all permissions", 5, true),
        (2, "Team Leader", "Team management and approval permissions", 4, false),
        (3, "Senior Media Buyer", "Advanced media buying and campaign management", 3, false),
        (4, "Media Buyer", "Standard media buying operations", 2, false),
        (5, "Media Analyst", "Data analysis and reporting", 1, false),
        (6, "Viewer", "Read-only access to reports and data", 0, false),
    ]
    .into_iter()
    .map(|(n, name, description, rank, is_read_only)| Role {
        id: role_id(n),
        name: name.to_owned(),
        description: description.to_owned(),
        rank,
        is_read_only,
    })
    .collect()
}

const MODULES: &[(u128, &str, &str)] = &[
    (1, "asset_management", "Asset Management"),
    (2, "budget_approval", "Budget Approval"),
    (3, "campaign_management", "Campaign Management"),
    (4, "reporting", "Reporting"),
];

const ACTIONS: &[(u128, PermissionAction)] = &[
    (1, PermissionAction::View),
    (2, PermissionAction::Edit),
    (3, PermissionAction::Approve),
    (4, PermissionAction::Export),
    (5, PermissionAction::Delete),
];

/// Fixture permission catalog: every action in every module.
#[must_use]
pub fn permissions() -> Vec<Permission> {
    let mut catalog = Vec::new();
    for (module_index, module, module_label) in MODULES {
        for (action_index, action) in ACTIONS {
            catalog.push(Permission {
                id: permission_id(*module_index, *action_index),
                name: format!("{} {}", action_label(*action), module_label),
                description: format!(
                    "{} access inside {}",
                    action_label(*action),
                    module_label
                ),
                module: (*module).to_owned(),
                action: *action,
            });
        }
    }
    catalog
}

fn action_label(action: PermissionAction) -> &'static str {
    match action {
        PermissionAction::View => "View",
        PermissionAction::Edit => "Edit",
        PermissionAction::Approve => "Approve",
        PermissionAction::Export => "Export",
        PermissionAction::Delete => "Delete",
    }
}

/// Fixture modules for the approver feature.
#[must_use]
pub fn modules() -> Vec<ModuleDefinition> {
    MODULES
        .iter()
        .map(|(_, slug, label)| ModuleDefinition {
            id: (*slug).to_owned(),
            name: (*label).to_owned(),
            description: format!("{label} functional area"),
            requires_approval: *slug != "reporting",
        })
        .collect()
}

/// Fixture role-permission entries: the Super Admin holds everything,
/// lower ranks hold progressively less.
#[must_use]
pub fn role_permissions() -> Vec<RolePermissionEntry> {
    let mut entries = Vec::new();

    // Super Admin: everything granted.
    for (module_index, ..) in MODULES {
        for (action_index, _) in ACTIONS {
            entries.push(RolePermissionEntry {
                role_id: role_id(1),
                permission_id: permission_id(*module_index, *action_index),
                granted: true,
            });
        }
    }

    // Team Leader: everything except deletes.
    for (module_index, ..) in MODULES {
        for (action_index, action) in ACTIONS {
            entries.push(RolePermissionEntry {
                role_id: role_id(2),
                permission_id: permission_id(*module_index, *action_index),
                granted: *action != PermissionAction::Delete,
            });
        }
    }

    // Media Buyer tiers: view everywhere, edit in campaign management.
    for buyer in [3, 4] {
        for (module_index, ..) in MODULES {
            entries.push(RolePermissionEntry {
                role_id: role_id(buyer),
                permission_id: permission_id(*module_index, 1),
                granted: true,
            });
        }
        entries.push(RolePermissionEntry {
            role_id: role_id(buyer),
            permission_id: permission_id(3, 2),
            granted: true,
        });
    }

    // Senior buyers may also approve campaigns.
    entries.push(RolePermissionEntry {
        role_id: role_id(3),
        permission_id: permission_id(3, 3),
        granted: true,
    });

    // Analyst: reporting only, with export.
    entries.push(RolePermissionEntry {
        role_id: role_id(5),
        permission_id: permission_id(4, 1),
        granted: true,
    });
    entries.push(RolePermissionEntry {
        role_id: role_id(5),
        permission_id: permission_id(4, 4),
        granted: true,
    });

    // Viewer: view-only, explicitly revoked everywhere else it once had
    // access.
    for (module_index, ..) in MODULES {
        entries.push(RolePermissionEntry {
            role_id: role_id(6),
            permission_id: permission_id(*module_index, 1),
            granted: *module_index != 2,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{permissions, role_permissions, roles};

    #[test]
    fn fixture_entries_reference_known_ids() {
        let known_roles: HashSet<_> = roles().into_iter().map(|role| role.id).collect();
        let known_permissions: HashSet<_> =
            permissions().into_iter().map(|permission| permission.id).collect();

        for entry in role_permissions() {
            assert!(known_roles.contains(&entry.role_id));
            assert!(known_permissions.contains(&entry.permission_id));
        }
    }

    #[test]
    fn fixture_entries_are_unique_per_pair() {
        let mut seen = HashSet::new();
        for entry in role_permissions() {
            assert!(
                seen.insert((entry.role_id, entry.permission_id)),
                "duplicate fixture entry"
            );
        }
    }
}
