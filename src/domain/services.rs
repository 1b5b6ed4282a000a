//! Projection and search services for the pet registry.
//!
//! This module turns raw store records into the display values the screens
//! render, and provides the stateless search filter applied on top of them.
//! Both are recomputed in full whenever the source snapshot or the query
//! changes; at registry scale there is nothing to gain from diffing.

use super::models::{Owner, Pet, PetType, Registry};

/// Projects the pet-type reference table into display values.
pub fn project_pet_types(registry: &Registry) -> Vec<PetType> {
    registry
        .pet_types
        .iter()
        .map(|record| PetType {
            id: record.id,
            name: record.name.clone(),
        })
        .collect()
}

/// Projects all pet records into display values.
///
/// The embedded owner is expanded one hop only: its `pets` list is left
/// empty, which is what breaks the Owner→Pet→Owner reference cycle.
///
/// # Examples
///
/// ```
/// use petbook::domain::{project_pets, Registry, PetDraft};
///
/// let mut registry = Registry::seeded();
/// let type_id = registry.pet_types[0].id;
/// registry.add_pet(PetDraft {
///     name: "Rex".to_string(),
///     age: 3,
///     type_id,
///     owner_name: Some("Ana".to_string()),
/// });
///
/// let pets = project_pets(&registry);
/// let owner = pets[0].owner.as_ref().unwrap();
/// assert_eq!(owner.name, "Ana");
/// assert!(owner.pets.is_empty());
/// ```
pub fn project_pets(registry: &Registry) -> Vec<Pet> {
    registry
        .pets
        .iter()
        .map(|record| Pet {
            id: record.id,
            name: record.name.clone(),
            age: record.age,
            pet_type: registry.pet_type(record.type_id).map(|t| PetType {
                id: t.id,
                name: t.name.clone(),
            }),
            owner: record.owner_id.and_then(|owner_id| {
                registry.owner(owner_id).map(|o| Owner {
                    id: o.id,
                    name: o.name.clone(),
                    pets: Vec::new(),
                })
            }),
        })
        .collect()
}

/// Projects all owner records into display values.
///
/// Each owner's pets are expanded one hop: the embedded pets carry their
/// type but no back-reference to the owner.
pub fn project_owners(registry: &Registry) -> Vec<Owner> {
    registry
        .owners
        .iter()
        .map(|record| Owner {
            id: record.id,
            name: record.name.clone(),
            pets: registry
                .pets
                .iter()
                .filter(|pet| pet.owner_id == Some(record.id))
                .map(|pet| Pet {
                    id: pet.id,
                    name: pet.name.clone(),
                    age: pet.age,
                    pet_type: registry.pet_type(pet.type_id).map(|t| PetType {
                        id: t.id,
                        name: t.name.clone(),
                    }),
                    owner: None,
                })
                .collect(),
        })
        .collect()
}

/// Filters items by case-insensitive substring match on a text key.
///
/// An empty query keeps everything. Order is preserved.
///
/// # Examples
///
/// ```
/// use petbook::domain::search;
///
/// let items = vec!["Rex", "Max", "Rexy"];
/// let hits = search(items, "rex", |s| s);
/// assert_eq!(hits, vec!["Rex", "Rexy"]);
/// ```
pub fn search<T>(items: Vec<T>, query: &str, mut key: impl FnMut(&T) -> &str) -> Vec<T> {
    if query.is_empty() {
        return items;
    }
    let needle = query.to_lowercase();
    items
        .into_iter()
        .filter(|item| key(item).to_lowercase().contains(&needle))
        .collect()
}
