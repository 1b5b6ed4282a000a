//! View-model for the owners screen.
//!
//! Mirrors the pets screen's snapshot/query recombination, adds the
//! expand/collapse selection, the edit-name dialog, and the removal veto
//! for owners who still have pets.

use crate::application::dialogs::{EditOwnerDialogState, RemoveOwnerDialogState};
use crate::domain::{project_owners, search, Owner, OwnerId};
use crate::infrastructure::PetStore;

#[derive(Debug, Default)]
pub struct OwnersScreen {
    /// Current search query; filters owners by name.
    pub search_query: String,
    /// Projected, filtered owners in display order.
    pub owners: Vec<Owner>,
    /// List selection cursor into `owners`.
    pub selected: usize,
    /// Owner whose card is expanded to show their pets, if any.
    pub expanded: Option<OwnerId>,
    pub edit_dialog: EditOwnerDialogState,
    pub remove_dialog: RemoveOwnerDialogState,
    seen_version: Option<u64>,
    query_dirty: bool,
}

impl OwnersScreen {
    /// Re-derives the projected list when the store or query changed.
    pub fn refresh(&mut self, store: &PetStore) {
        let version = store.version();
        if self.seen_version == Some(version) && !self.query_dirty {
            return;
        }

        let registry = store.snapshot();
        self.owners = search(project_owners(&registry), &self.search_query, |owner| {
            owner.name.as_str()
        });
        self.seen_version = Some(version);
        self.query_dirty = false;

        if self.selected >= self.owners.len() {
            self.selected = self.owners.len().saturating_sub(1);
        }
        if let Some(expanded) = self.expanded {
            if !self.owners.iter().any(|o| o.id == expanded) {
                self.expanded = None;
            }
        }
    }

    pub fn update_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.query_dirty = true;
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.owners.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_owner(&self) -> Option<&Owner> {
        self.owners.get(self.selected)
    }

    /// Expands the owner under the cursor, or collapses them if already
    /// expanded.
    pub fn toggle_expanded(&mut self) {
        let Some(owner) = self.selected_owner() else {
            return;
        };
        self.expanded = if self.expanded == Some(owner.id) {
            None
        } else {
            Some(owner.id)
        };
    }

    /// Opens the edit dialog seeded with the selected owner's name.
    pub fn initiate_edit_selected(&mut self) {
        if let Some(owner) = self.selected_owner().cloned() {
            self.edit_dialog.initiate(owner);
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit_dialog.cancel();
    }

    /// Saves the edit dialog's provisional name. Returns the new name for
    /// the status bar.
    pub fn save_edit(&mut self, store: &PetStore) -> Option<String> {
        let (id, name) = self.edit_dialog.save()?;
        store.rename_owner(id, &name);
        Some(name)
    }

    /// Tries to open the remove-confirmation dialog for the selected
    /// owner. Vetoed (returns `false`, dialog stays hidden) when the owner
    /// still has pets; removal only becomes possible once their pets are
    /// gone.
    pub fn initiate_remove_selected(&mut self) -> bool {
        let Some(owner) = self.selected_owner().cloned() else {
            return false;
        };
        if !owner.pets.is_empty() {
            return false;
        }
        self.remove_dialog.initiate(owner);
        true
    }

    pub fn cancel_remove(&mut self) {
        self.remove_dialog.cancel();
    }

    /// Confirms removal: issues the delete and hides the dialog without
    /// waiting on the delete's persistence. Returns the removed owner's
    /// name.
    pub fn confirm_remove(&mut self, store: &PetStore) -> Option<String> {
        let owner = self.remove_dialog.take_confirmed()?;
        store.remove_owner(owner.id);
        Some(owner.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PetDraft;

    fn store_with_owners() -> PetStore {
        let store = PetStore::in_memory();
        let type_id = store.snapshot().pet_types[0].id;
        store.add_pet(PetDraft {
            name: "Rex".to_string(),
            age: 3,
            type_id,
            owner_name: Some("Ana".to_string()),
        });
        store.add_pet(PetDraft {
            name: "Max".to_string(),
            age: 1,
            type_id,
            owner_name: Some("Ben".to_string()),
        });
        store
    }

    #[test]
    fn test_refresh_projects_owners_with_pets() {
        let store = store_with_owners();
        let mut screen = OwnersScreen::default();
        screen.refresh(&store);

        assert_eq!(screen.owners.len(), 2);
        assert_eq!(screen.owners[0].name, "Ana");
        assert_eq!(screen.owners[0].pets.len(), 1);
        assert_eq!(screen.owners[0].pets[0].name, "Rex");
    }

    #[test]
    fn test_search_filters_owners() {
        let store = store_with_owners();
        let mut screen = OwnersScreen::default();
        screen.update_search_query("ben");
        screen.refresh(&store);

        assert_eq!(screen.owners.len(), 1);
        assert_eq!(screen.owners[0].name, "Ben");
    }

    #[test]
    fn test_toggle_expanded() {
        let store = store_with_owners();
        let mut screen = OwnersScreen::default();
        screen.refresh(&store);

        assert!(screen.expanded.is_none());
        screen.toggle_expanded();
        assert_eq!(screen.expanded, Some(screen.owners[0].id));
        screen.toggle_expanded();
        assert!(screen.expanded.is_none());
    }

    #[test]
    fn test_expanded_cleared_when_owner_filtered_out() {
        let store = store_with_owners();
        let mut screen = OwnersScreen::default();
        screen.refresh(&store);
        screen.toggle_expanded();

        screen.update_search_query("ben");
        screen.refresh(&store);
        assert!(screen.expanded.is_none());
    }

    #[test]
    fn test_edit_flow_renames_owner() {
        let store = store_with_owners();
        let mut screen = OwnersScreen::default();
        screen.refresh(&store);

        screen.initiate_edit_selected();
        assert_eq!(screen.edit_dialog.provisional_name(), Some("Ana"));

        screen.edit_dialog.update_name("Anabel");
        let saved = screen.save_edit(&store);
        assert_eq!(saved.as_deref(), Some("Anabel"));

        screen.refresh(&store);
        assert!(screen.owners.iter().any(|o| o.name == "Anabel"));
    }

    #[test]
    fn test_cancel_edit_persists_nothing() {
        let store = store_with_owners();
        let mut screen = OwnersScreen::default();
        screen.refresh(&store);

        screen.initiate_edit_selected();
        screen.edit_dialog.update_name("Anabel");
        let version_before = store.version();
        screen.cancel_edit();

        assert_eq!(store.version(), version_before);
        screen.refresh(&store);
        assert!(screen.owners.iter().any(|o| o.name == "Ana"));
    }

    #[test]
    fn test_remove_vetoed_while_owner_has_pets() {
        let store = store_with_owners();
        let mut screen = OwnersScreen::default();
        screen.refresh(&store);

        assert!(!screen.initiate_remove_selected());
        assert!(!screen.remove_dialog.is_visible());
    }

    #[test]
    fn test_remove_allowed_once_pets_are_gone() {
        let store = store_with_owners();
        let mut screen = OwnersScreen::default();
        screen.refresh(&store);

        let rex = store.snapshot().pets[0].id;
        store.remove_pet(rex);
        screen.refresh(&store);

        assert!(screen.initiate_remove_selected());
        let removed = screen.confirm_remove(&store);
        assert_eq!(removed.as_deref(), Some("Ana"));

        screen.refresh(&store);
        assert_eq!(screen.owners.len(), 1);
        assert_eq!(screen.owners[0].name, "Ben");
    }

    #[test]
    fn test_cancel_remove_keeps_owner() {
        let store = store_with_owners();
        let mut screen = OwnersScreen::default();
        screen.refresh(&store);

        let rex = store.snapshot().pets[0].id;
        store.remove_pet(rex);
        screen.refresh(&store);

        assert!(screen.initiate_remove_selected());
        screen.cancel_remove();
        assert!(screen.confirm_remove(&store).is_none());

        screen.refresh(&store);
        assert_eq!(screen.owners.len(), 2);
    }
}
