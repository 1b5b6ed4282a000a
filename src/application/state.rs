//! Top-level application state for the terminal UI.
//!
//! `App` aggregates the store handle, the two screen view-models, and the
//! chrome-level state the presentation layer needs: which screen and input
//! focus are active, the status-bar message, the filename buffer for CSV
//! export, and which add-form field the cursor is on.

use crate::application::owners::OwnersScreen;
use crate::application::pets::PetsScreen;
use crate::domain::ExportError;
use crate::infrastructure::{PetStore, StoreEvent};

/// Which registry screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Pets,
    Owners,
}

/// Where keyboard input goes when no dialog is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Normal list navigation and shortcuts.
    Browse,
    /// Typing into the search bar; the list filters live.
    Search,
    /// Help overlay is shown.
    Help,
    /// Typing a filename for CSV export.
    ExportCsv,
}

/// Field focus within the add-pet form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddPetField {
    Name,
    Age,
    Type,
    HasOwner,
    OwnerName,
}

impl AddPetField {
    /// Next field in form order; the owner-name field is skipped while the
    /// "has owner" flag is unset.
    pub fn next(self, has_owner: bool) -> Self {
        match self {
            Self::Name => Self::Age,
            Self::Age => Self::Type,
            Self::Type => Self::HasOwner,
            Self::HasOwner if has_owner => Self::OwnerName,
            Self::HasOwner => Self::Name,
            Self::OwnerName => Self::Name,
        }
    }

    pub fn previous(self, has_owner: bool) -> Self {
        match self {
            Self::Name if has_owner => Self::OwnerName,
            Self::Name => Self::HasOwner,
            Self::Age => Self::Name,
            Self::Type => Self::Age,
            Self::HasOwner => Self::Type,
            Self::OwnerName => Self::HasOwner,
        }
    }
}

/// Main application state.
pub struct App {
    pub store: PetStore,
    pub screen: Screen,
    pub focus: Focus,
    pub pets: PetsScreen,
    pub owners: OwnersScreen,
    /// Transient message shown in the status bar.
    pub status_message: Option<String>,
    /// Input buffer for the CSV export filename.
    pub filename_input: String,
    /// Cursor position within `filename_input` or the search query.
    pub cursor_position: usize,
    /// Field the cursor is on inside the add-pet form.
    pub add_pet_focus: AddPetField,
    /// Highlighted entry while the pet-type dropdown is expanded.
    pub type_menu_index: usize,
    /// Scroll position in the help overlay.
    pub help_scroll: usize,
}

impl App {
    pub fn new(store: PetStore) -> Self {
        Self {
            store,
            screen: Screen::Pets,
            focus: Focus::Browse,
            pets: PetsScreen::default(),
            owners: OwnersScreen::default(),
            status_message: None,
            filename_input: String::new(),
            cursor_position: 0,
            add_pet_focus: AddPetField::Name,
            type_menu_index: 0,
            help_scroll: 0,
        }
    }

    /// Per-tick update: re-derives both screens from the store and drains
    /// any persistence-failure notifications into the status bar.
    pub fn refresh(&mut self) {
        self.pets.refresh(&self.store);
        self.owners.refresh(&self.store);
        while let Some(event) = self.store.try_recv_event() {
            match event {
                StoreEvent::PersistFailed(reason) => {
                    self.status_message = Some(format!("Save failed: {}", reason));
                }
            }
        }
    }

    /// True when a plain `q` should quit: browsing, with no dialog open.
    pub fn is_browsing(&self) -> bool {
        self.focus == Focus::Browse && !self.dialog_open()
    }

    /// Whether the active screen has any modal dialog open.
    pub fn dialog_open(&self) -> bool {
        match self.screen {
            Screen::Pets => {
                self.pets.add_dialog.is_visible() || self.pets.remove_dialog.is_visible()
            }
            Screen::Owners => {
                self.owners.edit_dialog.is_visible() || self.owners.remove_dialog.is_visible()
            }
        }
    }

    pub fn switch_to(&mut self, screen: Screen) {
        self.screen = screen;
        self.status_message = None;
    }

    pub fn active_search_query(&self) -> &str {
        match self.screen {
            Screen::Pets => &self.pets.search_query,
            Screen::Owners => &self.owners.search_query,
        }
    }

    pub fn set_active_search_query(&mut self, query: &str) {
        match self.screen {
            Screen::Pets => self.pets.update_search_query(query),
            Screen::Owners => self.owners.update_search_query(query),
        }
    }

    /// Moves focus to the search bar, keeping any existing query.
    pub fn start_search(&mut self) {
        self.focus = Focus::Search;
        self.cursor_position = self.active_search_query().len();
        self.status_message = None;
    }

    /// Leaves the search bar with the query still applied as a filter.
    pub fn finish_search(&mut self) {
        self.focus = Focus::Browse;
    }

    /// Clears the query and leaves the search bar.
    pub fn cancel_search(&mut self) {
        self.set_active_search_query("");
        self.cursor_position = 0;
        self.focus = Focus::Browse;
    }

    /// Opens the add-pet dialog with the form-field cursor reset.
    pub fn show_add_pet_dialog(&mut self) {
        self.pets.add_dialog.show();
        self.add_pet_focus = AddPetField::Name;
        self.type_menu_index = 0;
        self.status_message = None;
    }

    /// Switches to CSV-export mode with a default filename for the active
    /// screen.
    pub fn start_csv_export(&mut self) {
        self.focus = Focus::ExportCsv;
        self.filename_input = match self.screen {
            Screen::Pets => "pets.csv".to_string(),
            Screen::Owners => "owners.csv".to_string(),
        };
        self.cursor_position = self.filename_input.len();
        self.status_message = None;
    }

    /// The filename to export to, falling back to the screen default when
    /// the input was emptied.
    pub fn export_filename(&self) -> String {
        if self.filename_input.is_empty() {
            match self.screen {
                Screen::Pets => "pets.csv".to_string(),
                Screen::Owners => "owners.csv".to_string(),
            }
        } else {
            self.filename_input.clone()
        }
    }

    /// Records the outcome of a CSV export and returns to browsing.
    pub fn set_export_result(&mut self, result: Result<String, ExportError>) {
        match result {
            Ok(filename) => {
                self.status_message = Some(format!("Exported to {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Export failed: {}", error));
            }
        }
        self.focus = Focus::Browse;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    pub fn cancel_export(&mut self) {
        self.focus = Focus::Browse;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    pub fn show_help(&mut self) {
        self.focus = Focus::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.focus = Focus::Browse;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new(PetStore::in_memory());
        app.refresh();
        app
    }

    #[test]
    fn test_new_app_defaults() {
        let app = app();
        assert_eq!(app.screen, Screen::Pets);
        assert_eq!(app.focus, Focus::Browse);
        assert!(app.status_message.is_none());
        assert!(app.is_browsing());
    }

    #[test]
    fn test_dialog_open_tracks_active_screen() {
        let mut app = app();
        assert!(!app.dialog_open());

        app.show_add_pet_dialog();
        assert!(app.dialog_open());
        assert!(!app.is_browsing());

        // The dialog belongs to the pets screen; the owners screen has none
        // open.
        app.screen = Screen::Owners;
        assert!(!app.dialog_open());
    }

    #[test]
    fn test_search_lifecycle_per_screen() {
        let mut app = app();
        app.start_search();
        assert_eq!(app.focus, Focus::Search);

        app.set_active_search_query("rex");
        app.finish_search();
        assert_eq!(app.focus, Focus::Browse);
        assert_eq!(app.pets.search_query, "rex");
        assert_eq!(app.owners.search_query, "");

        app.start_search();
        assert_eq!(app.cursor_position, 3);
        app.cancel_search();
        assert_eq!(app.pets.search_query, "");
    }

    #[test]
    fn test_export_filename_defaults_per_screen() {
        let mut app = app();
        app.start_csv_export();
        assert_eq!(app.focus, Focus::ExportCsv);
        assert_eq!(app.export_filename(), "pets.csv");

        app.filename_input = "registry.csv".to_string();
        assert_eq!(app.export_filename(), "registry.csv");

        app.filename_input.clear();
        app.screen = Screen::Owners;
        assert_eq!(app.export_filename(), "owners.csv");
    }

    #[test]
    fn test_set_export_result_updates_status() {
        let mut app = app();
        app.start_csv_export();
        app.set_export_result(Ok("pets.csv".to_string()));
        assert_eq!(app.focus, Focus::Browse);
        assert!(app.status_message.as_ref().is_some_and(|m| m.contains("Exported to pets.csv")));
        assert!(app.filename_input.is_empty());
    }

    #[test]
    fn test_add_pet_field_cycle_without_owner() {
        let mut field = AddPetField::Name;
        let order = [
            AddPetField::Age,
            AddPetField::Type,
            AddPetField::HasOwner,
            AddPetField::Name,
        ];
        for expected in order {
            field = field.next(false);
            assert_eq!(field, expected);
        }
    }

    #[test]
    fn test_add_pet_field_cycle_with_owner() {
        assert_eq!(AddPetField::HasOwner.next(true), AddPetField::OwnerName);
        assert_eq!(AddPetField::OwnerName.next(true), AddPetField::Name);
        assert_eq!(AddPetField::Name.previous(true), AddPetField::OwnerName);
        assert_eq!(AddPetField::Name.previous(false), AddPetField::HasOwner);
    }

    #[test]
    fn test_refresh_surfaces_persist_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("registry.json");
        let mut app = App::new(PetStore::open(&path).expect("open should succeed"));

        // Removing the directory makes every later write fail.
        drop(dir);
        let type_id = app.store.snapshot().pet_types[0].id;
        app.store.add_pet(crate::domain::PetDraft {
            name: "Rex".to_string(),
            age: 3,
            type_id,
            owner_name: None,
        });

        for _ in 0..100 {
            app.refresh();
            if app.status_message.is_some() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(app
            .status_message
            .as_ref()
            .is_some_and(|m| m.starts_with("Save failed:")));
    }

    #[test]
    fn test_switch_screen_clears_status() {
        let mut app = app();
        app.status_message = Some("Registered Rex".to_string());
        app.switch_to(Screen::Owners);
        assert_eq!(app.screen, Screen::Owners);
        assert!(app.status_message.is_none());
    }
}
