//! Polymorphic ownership as sum types.
//!
//! The schema stores "owned by exactly one of account/character/business" as
//! three nullable references plus a discriminator, which Postgres cannot
//! constrain declaratively. These types are the application-side contract: the
//! query façade only writes owner columns produced by [`InventoryOwner`],
//! [`VehicleOwner`], or [`PartyRef`], and `try_from_columns` rejects any row
//! that violates exclusivity before it reaches a statement.

use uuid::Uuid;

use crate::enums::InventoryOwnerType;
use crate::error::{Error, Result};

/// Owner of an inventory. `World` covers drops and world stashes that belong
/// to no record at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryOwner {
    Account(Uuid),
    Character(Uuid),
    Business(Uuid),
    World,
}

/// The three nullable owner columns, in (account, character, business) order.
pub type OwnerColumns = (Option<Uuid>, Option<Uuid>, Option<Uuid>);

impl InventoryOwner {
    /// Discriminator value stored alongside the owner columns.
    pub fn owner_type(&self) -> InventoryOwnerType {
        match self {
            InventoryOwner::Account(_) => InventoryOwnerType::Account,
            InventoryOwner::Character(_) => InventoryOwnerType::Character,
            InventoryOwner::Business(_) => InventoryOwnerType::Business,
            InventoryOwner::World => InventoryOwnerType::World,
        }
    }

    /// Column tuple for the storage boundary.
    pub fn into_columns(self) -> OwnerColumns {
        match self {
            InventoryOwner::Account(id) => (Some(id), None, None),
            InventoryOwner::Character(id) => (None, Some(id), None),
            InventoryOwner::Business(id) => (None, None, Some(id)),
            InventoryOwner::World => (None, None, None),
        }
    }

    /// Reconstruct an owner from stored columns, enforcing that the populated
    /// reference matches the discriminator and the other two are absent.
    pub fn try_from_columns(owner_type: InventoryOwnerType, columns: OwnerColumns) -> Result<Self> {
        let (account, character, business) = columns;
        let owner = match (owner_type, account, character, business) {
            (InventoryOwnerType::Account, Some(id), None, None) => InventoryOwner::Account(id),
            (InventoryOwnerType::Character, None, Some(id), None) => InventoryOwner::Character(id),
            (InventoryOwnerType::Business, None, None, Some(id)) => InventoryOwner::Business(id),
            (InventoryOwnerType::World, None, None, None) => InventoryOwner::World,
            _ => {
                return Err(Error::InvalidOwner(format!(
                    "owner columns inconsistent with discriminator {owner_type:?} \
                     (account={account:?}, character={character:?}, business={business:?})"
                )));
            }
        };
        Ok(owner)
    }
}

/// Owner of a vehicle. Vehicles carry no discriminator column; exclusivity is
/// still required on every write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleOwner {
    Account(Uuid),
    Character(Uuid),
    Business(Uuid),
}

impl VehicleOwner {
    pub fn into_columns(self) -> OwnerColumns {
        match self {
            VehicleOwner::Account(id) => (Some(id), None, None),
            VehicleOwner::Character(id) => (None, Some(id), None),
            VehicleOwner::Business(id) => (None, None, Some(id)),
        }
    }

    /// Reconstruct from stored columns. All-null is legal (account deletion
    /// clears the reference but the vehicle survives) and yields `None`.
    pub fn try_from_columns(columns: OwnerColumns) -> Result<Option<Self>> {
        match columns {
            (Some(id), None, None) => Ok(Some(VehicleOwner::Account(id))),
            (None, Some(id), None) => Ok(Some(VehicleOwner::Character(id))),
            (None, None, Some(id)) => Ok(Some(VehicleOwner::Business(id))),
            (None, None, None) => Ok(None),
            (account, character, business) => Err(Error::InvalidOwner(format!(
                "vehicle owner columns not mutually exclusive \
                 (account={account:?}, character={character:?}, business={business:?})"
            ))),
        }
    }
}

/// Account-or-character reference used by property ownerships and keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRef {
    Account(Uuid),
    Character(Uuid),
}

impl PartyRef {
    /// Column pair in (account, character) order.
    pub fn into_columns(self) -> (Option<Uuid>, Option<Uuid>) {
        match self {
            PartyRef::Account(id) => (Some(id), None),
            PartyRef::Character(id) => (None, Some(id)),
        }
    }

    pub fn try_from_columns(columns: (Option<Uuid>, Option<Uuid>)) -> Result<Self> {
        match columns {
            (Some(id), None) => Ok(PartyRef::Account(id)),
            (None, Some(id)) => Ok(PartyRef::Character(id)),
            (account, character) => Err(Error::InvalidOwner(format!(
                "party reference must name exactly one of account/character \
                 (account={account:?}, character={character:?})"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_owner_round_trips_through_columns() {
        let id = Uuid::new_v4();
        for owner in [
            InventoryOwner::Account(id),
            InventoryOwner::Character(id),
            InventoryOwner::Business(id),
            InventoryOwner::World,
        ] {
            let columns = owner.into_columns();
            let back = InventoryOwner::try_from_columns(owner.owner_type(), columns).unwrap();
            assert_eq!(back, owner);
        }
    }

    #[test]
    fn mismatched_discriminator_is_rejected() {
        let id = Uuid::new_v4();
        // Discriminator says character, but a business reference is set.
        let result = InventoryOwner::try_from_columns(
            InventoryOwnerType::Character,
            (None, Some(id), Some(id)),
        );
        assert!(matches!(result, Err(Error::InvalidOwner(_))));
    }

    #[test]
    fn world_owner_must_carry_no_references() {
        let id = Uuid::new_v4();
        let result =
            InventoryOwner::try_from_columns(InventoryOwnerType::World, (Some(id), None, None));
        assert!(matches!(result, Err(Error::InvalidOwner(_))));
    }

    #[test]
    fn vehicle_owner_allows_all_null() {
        assert_eq!(VehicleOwner::try_from_columns((None, None, None)).unwrap(), None);
    }

    #[test]
    fn vehicle_owner_rejects_two_references() {
        let id = Uuid::new_v4();
        let result = VehicleOwner::try_from_columns((Some(id), Some(id), None));
        assert!(matches!(result, Err(Error::InvalidOwner(_))));
    }

    #[test]
    fn party_ref_requires_exactly_one_side() {
        let id = Uuid::new_v4();
        assert!(PartyRef::try_from_columns((None, None)).is_err());
        assert!(PartyRef::try_from_columns((Some(id), Some(id))).is_err());
        assert_eq!(
            PartyRef::try_from_columns((Some(id), None)).unwrap(),
            PartyRef::Account(id)
        );
    }
}
