//! Closed enumerated domains backing the Postgres enum types.
//!
//! Every variant maps to a database enum label in snake_case; a value outside
//! the declared set fails at the store, it is never coerced.

use serde::{Deserialize, Serialize};

/// Device/network identifier kinds that can be bound to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "identifier_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IdentifierType {
    PlatformId,
    License,
    Discord,
    PlatformAlt,
    XboxLive,
    Ip,
    HardwareId,
}

/// Access-approval state for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "whitelist_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WhitelistStatus {
    Pending,
    Approved,
    Denied,
    Revoked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "character_gender", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CharacterGender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "garage_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GarageType {
    Public,
    Private,
    Business,
    Impound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "vehicle_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleState {
    Stored,
    Out,
    Impounded,
}

/// Currency a ledger entry moves. Balances are tracked per currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "currency_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CurrencyType {
    Cash,
    Bank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "property_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    House,
    BusinessProp,
    Garage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "phone_call_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PhoneCallStatus {
    Missed,
    Completed,
    Declined,
}

/// Discriminator for the polymorphic inventory owner columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "inventory_owner_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InventoryOwnerType {
    Character,
    Account,
    Business,
    World,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "inventory_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InventoryType {
    Player,
    Stash,
    Trunk,
    Glovebox,
    Property,
    Drop,
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::*;

    #[test]
    fn identifier_type_serializes_snake_case() -> Result<()> {
        let json = serde_json::to_string(&IdentifierType::XboxLive)?;
        assert_eq!(json, "\"xbox_live\"");
        let json = serde_json::to_string(&IdentifierType::HardwareId)?;
        assert_eq!(json, "\"hardware_id\"");
        Ok(())
    }

    #[test]
    fn owner_type_round_trips() -> Result<()> {
        for owner in [
            InventoryOwnerType::Character,
            InventoryOwnerType::Account,
            InventoryOwnerType::Business,
            InventoryOwnerType::World,
        ] {
            let json = serde_json::to_string(&owner)?;
            let back: InventoryOwnerType = serde_json::from_str(&json)?;
            assert_eq!(back, owner);
        }
        Ok(())
    }

    #[test]
    fn unknown_label_is_rejected() {
        let parsed: Result<WhitelistStatus, _> = serde_json::from_str("\"banned\"");
        assert!(parsed.is_err());
    }
}
