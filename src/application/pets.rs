//! View-model for the pets screen.
//!
//! Combines the store's latest snapshot with the search query and the two
//! dialog states into the values the view renders. Projection and filtering
//! are recomputed whenever the store version moves or the query changes;
//! nothing is diffed incrementally.

use crate::application::dialogs::{AddPetDialogState, RemovePetDialogState};
use crate::domain::{project_pet_types, project_pets, search, Pet, PetType};
use crate::infrastructure::PetStore;

#[derive(Debug, Default)]
pub struct PetsScreen {
    /// Current search query; filters pets by name.
    pub search_query: String,
    /// Projected, filtered pets in display order.
    pub pets: Vec<Pet>,
    /// Projected pet-type reference table (feeds the add-form dropdown).
    pub pet_types: Vec<PetType>,
    /// List selection cursor into `pets`.
    pub selected: usize,
    pub add_dialog: AddPetDialogState,
    pub remove_dialog: RemovePetDialogState,
    seen_version: Option<u64>,
    query_dirty: bool,
}

impl PetsScreen {
    /// Re-derives the projected lists when the store or query changed.
    /// Called once per event-loop tick.
    pub fn refresh(&mut self, store: &PetStore) {
        let version = store.version();
        if self.seen_version == Some(version) && !self.query_dirty {
            return;
        }

        let registry = store.snapshot();
        self.pet_types = project_pet_types(&registry);
        self.pets = search(project_pets(&registry), &self.search_query, |pet| {
            pet.name.as_str()
        });
        self.seen_version = Some(version);
        self.query_dirty = false;

        if self.selected >= self.pets.len() {
            self.selected = self.pets.len().saturating_sub(1);
        }
    }

    pub fn update_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.query_dirty = true;
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.pets.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_pet(&self) -> Option<&Pet> {
        self.pets.get(self.selected)
    }

    /// Submits the add-pet form. On successful validation the draft is
    /// handed to the store (persistence is fire-and-forget from there) and
    /// the registered pet's name is returned for the status bar. On a
    /// validation failure the dialog stays open with warnings set and
    /// nothing is persisted.
    pub fn submit_add(&mut self, store: &PetStore) -> Option<String> {
        let draft = self.add_dialog.submit()?;
        let name = draft.name.clone();
        store.add_pet(draft);
        Some(name)
    }

    /// Opens the remove-confirmation dialog for the pet under the cursor.
    pub fn initiate_remove_selected(&mut self) {
        if let Some(pet) = self.selected_pet().cloned() {
            self.remove_dialog.initiate(pet);
        }
    }

    pub fn cancel_remove(&mut self) {
        self.remove_dialog.cancel();
    }

    /// Confirms removal: issues the delete and hides the dialog without
    /// waiting on the delete's persistence. Returns the removed pet's name.
    pub fn confirm_remove(&mut self, store: &PetStore) -> Option<String> {
        let pet = self.remove_dialog.take_confirmed()?;
        store.remove_pet(pet.id);
        Some(pet.name)
    }
}
