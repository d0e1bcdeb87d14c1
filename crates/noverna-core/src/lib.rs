//! Core contracts for the Noverna world-state store.
//!
//! This crate defines the entity catalog, the closed enumerated domains, the
//! polymorphic-owner sum types, and the named relation registry shared by the
//! store crate and by callers constructing type-safe queries. It performs no
//! I/O.

pub mod entities;
pub mod enums;
pub mod error;
pub mod owner;
pub mod relations;

pub use entities::Entity;
pub use entities::accounts::{Account, AccountIdentifier, Ban, WhitelistEntry};
pub use entities::audit::AuditLog;
pub use entities::businesses::{Business, BusinessMembership, BusinessRole};
pub use entities::characters::{Character, CharacterAppearance, CharacterFlag};
pub use entities::configs::ConfigEntry;
pub use entities::economy::LedgerEntry;
pub use entities::housing::{
    Property, PropertyKey, PropertyLog, PropertyOwnership, PropertyUnit,
};
pub use entities::inventory::{Inventory, InventoryItem, ItemTemplate};
pub use entities::jobs::{CharacterJob, Job, JobGrade};
pub use entities::phone::{PhoneCall, PhoneContact, PhoneMessage, PhoneNumber};
pub use entities::rbac::{Permission, Role, RoleAssignment, RolePermission};
pub use entities::sessions::PlaySession;
pub use entities::vehicles::{Garage, Vehicle, VehicleKey, VehicleLog};
pub use enums::{
    CharacterGender, CurrencyType, GarageType, IdentifierType, InventoryOwnerType,
    InventoryType, PhoneCallStatus, PropertyType, VehicleState, WhitelistStatus,
};
pub use error::{Error, Result};
pub use owner::{InventoryOwner, OwnerColumns, PartyRef, VehicleOwner};
pub use relations::{Cardinality, RELATIONS, RelationDef, relation};
