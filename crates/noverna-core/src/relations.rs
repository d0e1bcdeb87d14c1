//! Named, directed relations between catalog entities.
//!
//! Callers traverse by relation name instead of re-deriving join paths, and
//! the declared cardinality is authoritative: the resolver returns
//! zero-or-one or zero-or-many according to the definition, never according
//! to what the data happens to contain. Pairs of entities connected by more
//! than one edge get one named relation per edge (an account relates to bans
//! as subject, issuer, and revoker independently).

use crate::error::{Error, Result};

/// Declared result shape of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Zero or one related row.
    One,
    /// Zero or more related rows.
    Many,
}

/// One directed traversal path: rows of `target_table` whose `target_column`
/// equals the source row's `source_column` value.
#[derive(Debug, Clone, Copy)]
pub struct RelationDef {
    pub name: &'static str,
    pub source_table: &'static str,
    pub source_column: &'static str,
    pub target_table: &'static str,
    pub target_column: &'static str,
    pub cardinality: Cardinality,
}

const fn one(
    name: &'static str,
    source_table: &'static str,
    source_column: &'static str,
    target_table: &'static str,
    target_column: &'static str,
) -> RelationDef {
    RelationDef {
        name,
        source_table,
        source_column,
        target_table,
        target_column,
        cardinality: Cardinality::One,
    }
}

const fn many(
    name: &'static str,
    source_table: &'static str,
    source_column: &'static str,
    target_table: &'static str,
    target_column: &'static str,
) -> RelationDef {
    RelationDef {
        name,
        source_table,
        source_column,
        target_table,
        target_column,
        cardinality: Cardinality::Many,
    }
}

/// The full relation registry.
pub const RELATIONS: &[RelationDef] = &[
    // Accounts
    many("account.identifiers", "accounts", "id", "account_identifiers", "account_id"),
    many("account.characters", "accounts", "id", "characters", "account_id"),
    many("account.role_assignments", "accounts", "id", "role_assignments", "account_id"),
    many("account.sessions", "accounts", "id", "play_sessions", "account_id"),
    one("account.whitelist", "accounts", "id", "whitelists", "account_id"),
    many("account.reviewed_whitelists", "accounts", "id", "whitelists", "reviewer_account_id"),
    many("account.bans", "accounts", "id", "bans", "account_id"),
    many("account.issued_bans", "accounts", "id", "bans", "issued_by_account_id"),
    many("account.revoked_bans", "accounts", "id", "bans", "revoked_by_account_id"),
    one("account_identifier.account", "account_identifiers", "account_id", "accounts", "id"),
    one("whitelist.account", "whitelists", "account_id", "accounts", "id"),
    one("whitelist.reviewer", "whitelists", "reviewer_account_id", "accounts", "id"),
    one("ban.account", "bans", "account_id", "accounts", "id"),
    one("ban.issuer", "bans", "issued_by_account_id", "accounts", "id"),
    one("ban.revoker", "bans", "revoked_by_account_id", "accounts", "id"),
    // RBAC
    many("role.assignments", "roles", "id", "role_assignments", "role_id"),
    many("role.grants", "roles", "id", "role_permissions", "role_id"),
    many("permission.grants", "permissions", "name", "role_permissions", "permission_name"),
    one("role_assignment.role", "role_assignments", "role_id", "roles", "id"),
    one("role_assignment.account", "role_assignments", "account_id", "accounts", "id"),
    one("role_permission.role", "role_permissions", "role_id", "roles", "id"),
    one("role_permission.permission", "role_permissions", "permission_name", "permissions", "name"),
    // Sessions
    one("session.account", "play_sessions", "account_id", "accounts", "id"),
    // Characters
    one("character.account", "characters", "account_id", "accounts", "id"),
    many("character.jobs", "characters", "id", "character_jobs", "character_id"),
    one("character.appearance", "characters", "id", "character_appearances", "character_id"),
    many("character.flags", "characters", "id", "character_flags", "character_id"),
    one("character_appearance.character", "character_appearances", "character_id", "characters", "id"),
    one("character_flag.character", "character_flags", "character_id", "characters", "id"),
    // Jobs
    many("job.grades", "jobs", "id", "job_grades", "job_id"),
    many("job.assignments", "jobs", "id", "character_jobs", "job_id"),
    one("job_grade.job", "job_grades", "job_id", "jobs", "id"),
    many("job_grade.assignments", "job_grades", "id", "character_jobs", "job_grade_id"),
    one("character_job.character", "character_jobs", "character_id", "characters", "id"),
    one("character_job.job", "character_jobs", "job_id", "jobs", "id"),
    one("character_job.grade", "character_jobs", "job_grade_id", "job_grades", "id"),
    // Businesses
    many("business.roles", "businesses", "id", "business_roles", "business_id"),
    many("business.members", "businesses", "id", "business_memberships", "business_id"),
    one("business_role.business", "business_roles", "business_id", "businesses", "id"),
    many("business_role.members", "business_roles", "id", "business_memberships", "role_id"),
    one("business_membership.business", "business_memberships", "business_id", "businesses", "id"),
    one("business_membership.account", "business_memberships", "account_id", "accounts", "id"),
    one("business_membership.role", "business_memberships", "role_id", "business_roles", "id"),
    // Vehicles
    many("garage.vehicles", "garages", "id", "vehicles", "garage_id"),
    one("vehicle.garage", "vehicles", "garage_id", "garages", "id"),
    one("vehicle.owner_account", "vehicles", "account_id", "accounts", "id"),
    one("vehicle.owner_character", "vehicles", "character_id", "characters", "id"),
    one("vehicle.owner_business", "vehicles", "business_id", "businesses", "id"),
    many("vehicle.keys", "vehicles", "id", "vehicle_keys", "vehicle_id"),
    many("vehicle.logs", "vehicles", "id", "vehicle_logs", "vehicle_id"),
    one("vehicle_key.vehicle", "vehicle_keys", "vehicle_id", "vehicles", "id"),
    one("vehicle_key.holder", "vehicle_keys", "account_id", "accounts", "id"),
    one("vehicle_log.vehicle", "vehicle_logs", "vehicle_id", "vehicles", "id"),
    one("vehicle_log.actor", "vehicle_logs", "actor_account_id", "accounts", "id"),
    // Economy
    one("ledger.actor", "economy_ledger", "actor_account_id", "accounts", "id"),
    one("ledger.source_character", "economy_ledger", "source_character_id", "characters", "id"),
    one("ledger.source_business", "economy_ledger", "source_business_id", "businesses", "id"),
    one("ledger.target_character", "economy_ledger", "target_character_id", "characters", "id"),
    one("ledger.target_business", "economy_ledger", "target_business_id", "businesses", "id"),
    // Inventory
    many("item_template.items", "item_templates", "id", "inventory_items", "template_id"),
    one("inventory.owner_account", "inventories", "owner_account_id", "accounts", "id"),
    one("inventory.owner_character", "inventories", "owner_character_id", "characters", "id"),
    one("inventory.owner_business", "inventories", "owner_business_id", "businesses", "id"),
    many("inventory.items", "inventories", "id", "inventory_items", "inventory_id"),
    one("inventory_item.inventory", "inventory_items", "inventory_id", "inventories", "id"),
    one("inventory_item.template", "inventory_items", "template_id", "item_templates", "id"),
    // Housing
    many("property.units", "properties", "id", "property_units", "property_id"),
    one("property_unit.property", "property_units", "property_id", "properties", "id"),
    many("property_unit.ownerships", "property_units", "id", "property_ownerships", "unit_id"),
    many("property_unit.keys", "property_units", "id", "property_keys", "unit_id"),
    many("property_unit.logs", "property_units", "id", "property_logs", "unit_id"),
    one("property_ownership.unit", "property_ownerships", "unit_id", "property_units", "id"),
    one("property_ownership.account", "property_ownerships", "account_id", "accounts", "id"),
    one("property_ownership.character", "property_ownerships", "character_id", "characters", "id"),
    one("property_key.unit", "property_keys", "unit_id", "property_units", "id"),
    one("property_key.account", "property_keys", "account_id", "accounts", "id"),
    one("property_key.character", "property_keys", "character_id", "characters", "id"),
    one("property_log.unit", "property_logs", "unit_id", "property_units", "id"),
    one("property_log.actor_account", "property_logs", "actor_account_id", "accounts", "id"),
    one("property_log.actor_character", "property_logs", "actor_character_id", "characters", "id"),
    // Phone
    one("phone_number.character", "phone_numbers", "character_id", "characters", "id"),
    many("phone_number.contacts", "phone_numbers", "id", "phone_contacts", "owner_number_id"),
    many("phone_number.messages_from", "phone_numbers", "id", "phone_messages", "from_number_id"),
    many("phone_number.messages_to", "phone_numbers", "id", "phone_messages", "to_number_id"),
    many("phone_number.calls_from", "phone_numbers", "id", "phone_calls", "from_number_id"),
    many("phone_number.calls_to", "phone_numbers", "id", "phone_calls", "to_number_id"),
    one("phone_contact.owner", "phone_contacts", "owner_number_id", "phone_numbers", "id"),
    one("phone_message.from", "phone_messages", "from_number_id", "phone_numbers", "id"),
    one("phone_message.to", "phone_messages", "to_number_id", "phone_numbers", "id"),
    one("phone_call.from", "phone_calls", "from_number_id", "phone_numbers", "id"),
    one("phone_call.to", "phone_calls", "to_number_id", "phone_numbers", "id"),
    // Audit
    one("audit_log.actor", "audit_logs", "actor_account_id", "accounts", "id"),
];

/// Look up a relation by name.
pub fn relation(name: &str) -> Result<&'static RelationDef> {
    RELATIONS
        .iter()
        .find(|rel| rel.name == name)
        .ok_or_else(|| Error::UnknownRelation(name.to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn relation_names_are_unique() {
        let mut seen = BTreeSet::new();
        for rel in RELATIONS {
            assert!(seen.insert(rel.name), "duplicate relation name: {}", rel.name);
        }
    }

    #[test]
    fn lookup_finds_known_relation() {
        let rel = relation("account.characters").unwrap();
        assert_eq!(rel.target_table, "characters");
        assert_eq!(rel.target_column, "account_id");
        assert_eq!(rel.cardinality, Cardinality::Many);
    }

    #[test]
    fn lookup_rejects_unknown_relation() {
        assert!(matches!(
            relation("account.pets"),
            Err(Error::UnknownRelation(_))
        ));
    }

    #[test]
    fn ban_edges_are_disambiguated() {
        // Three independent account<->ban edges, each with its own column.
        let subject = relation("account.bans").unwrap();
        let issued = relation("account.issued_bans").unwrap();
        let revoked = relation("account.revoked_bans").unwrap();
        assert_eq!(subject.target_column, "account_id");
        assert_eq!(issued.target_column, "issued_by_account_id");
        assert_eq!(revoked.target_column, "revoked_by_account_id");
        for rel in [subject, issued, revoked] {
            assert_eq!(rel.target_table, "bans");
            assert_eq!(rel.cardinality, Cardinality::Many);
        }
    }

    #[test]
    fn forward_and_reverse_character_edges_agree() {
        let forward = relation("account.characters").unwrap();
        let reverse = relation("character.account").unwrap();
        assert_eq!(forward.target_column, reverse.source_column);
        assert_eq!(forward.source_table, reverse.target_table);
        assert_eq!(reverse.cardinality, Cardinality::One);
    }

    #[test]
    fn whitelist_is_one_per_account() {
        assert_eq!(
            relation("account.whitelist").unwrap().cardinality,
            Cardinality::One
        );
    }
}
