use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a pet type record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PetTypeId(pub Uuid);

/// Identity of a pet record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PetId(pub Uuid);

/// Identity of an owner record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub Uuid);

impl PetTypeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl PetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl OwnerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PetTypeId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for PetId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

/// A kind of pet, sourced from the registry's reference table.
///
/// Pet types are seeded when a registry is created and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PetType {
    pub id: PetTypeId,
    pub name: String,
}

/// A pet as presented to the UI.
///
/// `owner`, when present, is a one-hop projection: its `pets` list is always
/// empty so that the Owner→Pet→Owner reference cycle cannot recurse.
#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub age: i32,
    pub pet_type: Option<PetType>,
    pub owner: Option<Owner>,
}

/// An owner as presented to the UI.
///
/// `pets`, when populated, holds one-hop projections whose `owner` field is
/// `None` for the same cycle-breaking reason as [`Pet::owner`].
#[derive(Debug, Clone, PartialEq)]
pub struct Owner {
    pub id: OwnerId,
    pub name: String,
    pub pets: Vec<Pet>,
}

/// The payload of a validated add-pet submission.
///
/// `owner_name` is `None` when the form's "has owner" flag was unset.
#[derive(Debug, Clone, PartialEq)]
pub struct PetDraft {
    pub name: String,
    pub age: i32,
    pub type_id: PetTypeId,
    pub owner_name: Option<String>,
}

/// Stored pet-type record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetTypeRecord {
    pub id: PetTypeId,
    pub name: String,
}

/// Stored pet record. References its type and (optionally) its owner by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetRecord {
    pub id: PetId,
    pub name: String,
    pub age: i32,
    pub type_id: PetTypeId,
    pub owner_id: Option<OwnerId>,
}

/// Stored owner record. An owner's pets are found by scanning pet records
/// rather than stored inline, so the relationship has one source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerRecord {
    pub id: OwnerId,
    pub name: String,
}

/// Pet types seeded into a freshly created registry.
pub const DEFAULT_PET_TYPES: [&str; 5] = ["Dog", "Cat", "Bird", "Fish", "Hamster"];

/// The full contents of the embedded object store.
///
/// All mutations are pure in-memory operations; locking, change notification,
/// and persistence live in the infrastructure layer.
///
/// # Examples
///
/// ```
/// use petbook::domain::{Registry, PetDraft};
///
/// let mut registry = Registry::seeded();
/// let type_id = registry.pet_types[0].id;
/// registry.add_pet(PetDraft {
///     name: "Rex".to_string(),
///     age: 3,
///     type_id,
///     owner_name: Some("Ana".to_string()),
/// });
/// assert_eq!(registry.pets.len(), 1);
/// assert_eq!(registry.owners.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Registry {
    pub pet_types: Vec<PetTypeRecord>,
    pub pets: Vec<PetRecord>,
    pub owners: Vec<OwnerRecord>,
}

impl Registry {
    /// Creates an empty registry with the default pet-type reference table.
    pub fn seeded() -> Self {
        Self {
            pet_types: DEFAULT_PET_TYPES
                .iter()
                .map(|name| PetTypeRecord {
                    id: PetTypeId::new(),
                    name: name.to_string(),
                })
                .collect(),
            pets: Vec::new(),
            owners: Vec::new(),
        }
    }

    pub fn pet_type(&self, id: PetTypeId) -> Option<&PetTypeRecord> {
        self.pet_types.iter().find(|t| t.id == id)
    }

    pub fn owner(&self, id: OwnerId) -> Option<&OwnerRecord> {
        self.owners.iter().find(|o| o.id == id)
    }

    /// Finds an owner by name, ignoring case and surrounding whitespace.
    pub fn owner_named(&self, name: &str) -> Option<&OwnerRecord> {
        let needle = name.trim().to_lowercase();
        self.owners.iter().find(|o| o.name.trim().to_lowercase() == needle)
    }

    /// Inserts a pet from a validated draft and returns its new id.
    ///
    /// When the draft carries an owner name, the pet is attached to the
    /// existing owner with that name (case-insensitive match) or to a newly
    /// created owner. A blank owner name is treated as "no owner" even
    /// though the add-pet form never submits one.
    pub fn add_pet(&mut self, draft: PetDraft) -> PetId {
        let owner_id = draft
            .owner_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(|name| self.owner_id_for(name));

        let record = PetRecord {
            id: PetId::new(),
            name: draft.name,
            age: draft.age,
            type_id: draft.type_id,
            owner_id,
        };
        let id = record.id;
        self.pets.push(record);
        id
    }

    fn owner_id_for(&mut self, name: &str) -> OwnerId {
        if let Some(existing) = self.owner_named(name) {
            return existing.id;
        }
        let record = OwnerRecord {
            id: OwnerId::new(),
            name: name.trim().to_string(),
        };
        let id = record.id;
        self.owners.push(record);
        id
    }

    /// Renames an owner. Returns `false` when no such owner exists.
    pub fn rename_owner(&mut self, id: OwnerId, name: &str) -> bool {
        match self.owners.iter_mut().find(|o| o.id == id) {
            Some(owner) => {
                owner.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Deletes a pet. Returns `false` when no such pet exists.
    pub fn remove_pet(&mut self, id: PetId) -> bool {
        let before = self.pets.len();
        self.pets.retain(|p| p.id != id);
        self.pets.len() != before
    }

    /// Deletes an owner, detaching any pets still registered to them.
    ///
    /// The UI refuses to initiate removal of an owner with pets, so the
    /// detach branch only matters for direct store callers; it keeps the
    /// registry free of dangling owner references either way.
    pub fn remove_owner(&mut self, id: OwnerId) -> bool {
        let before = self.owners.len();
        self.owners.retain(|o| o.id != id);
        if self.owners.len() == before {
            return false;
        }
        for pet in self.pets.iter_mut().filter(|p| p.owner_id == Some(id)) {
            pet.owner_id = None;
        }
        true
    }
}
