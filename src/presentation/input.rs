use crate::application::{AddPetField, App, Focus, Screen};
use crate::infrastructure::CsvExporter;
use crossterm::event::{KeyCode, KeyModifiers};

/// Byte index of the start of the character just before `pos`. `pos` must
/// lie on a char boundary; returns 0 at the start of the text.
fn prev_char_start(text: &str, pos: usize) -> usize {
    text[..pos]
        .chars()
        .next_back()
        .map(|c| pos - c.len_utf8())
        .unwrap_or(0)
}

/// Byte index just past the character at `pos`, or `pos` itself at the end
/// of the text.
fn next_char_end(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(pos)
}

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.focus {
            Focus::Help => Self::handle_help_mode(app, key),
            Focus::ExportCsv => Self::handle_export_filename_mode(app, key),
            Focus::Search => Self::handle_search_mode(app, key),
            Focus::Browse => Self::handle_browse(app, key, modifiers),
        }
    }

    fn handle_browse(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        // Open dialogs take input before any list shortcut.
        match app.screen {
            Screen::Pets => {
                if app.pets.add_dialog.is_visible() {
                    return Self::handle_add_pet_dialog(app, key);
                }
                if app.pets.remove_dialog.is_visible() {
                    return Self::handle_remove_pet_dialog(app, key);
                }
                Self::handle_pets_browse(app, key, modifiers)
            }
            Screen::Owners => {
                if app.owners.edit_dialog.is_visible() {
                    return Self::handle_edit_owner_dialog(app, key);
                }
                if app.owners.remove_dialog.is_visible() {
                    return Self::handle_remove_owner_dialog(app, key);
                }
                Self::handle_owners_browse(app, key, modifiers)
            }
        }
    }

    fn handle_pets_browse(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('e') = key {
                app.start_csv_export();
            }
            return;
        }

        app.status_message = None;
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.pets.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.pets.select_next(),
            KeyCode::Char('a') => app.show_add_pet_dialog(),
            KeyCode::Char('d') | KeyCode::Delete => app.pets.initiate_remove_selected(),
            KeyCode::Char('/') => app.start_search(),
            KeyCode::Tab | KeyCode::Char('2') => app.switch_to(Screen::Owners),
            KeyCode::Char('1') => app.switch_to(Screen::Pets),
            KeyCode::F(1) | KeyCode::Char('?') => app.show_help(),
            KeyCode::Esc => {
                if !app.pets.search_query.is_empty() {
                    app.pets.update_search_query("");
                }
            }
            _ => {}
        }
    }

    fn handle_owners_browse(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('e') = key {
                app.start_csv_export();
            }
            return;
        }

        app.status_message = None;
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.owners.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.owners.select_next(),
            KeyCode::Enter => app.owners.toggle_expanded(),
            KeyCode::Char('e') => app.owners.initiate_edit_selected(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if !app.owners.initiate_remove_selected() {
                    if let Some(owner) = app.owners.selected_owner() {
                        if !owner.pets.is_empty() {
                            let noun = if owner.pets.len() == 1 { "pet" } else { "pets" };
                            app.status_message = Some(format!(
                                "Cannot unregister {}: {} {} still registered",
                                owner.name,
                                owner.pets.len(),
                                noun
                            ));
                        }
                    }
                }
            }
            KeyCode::Char('/') => app.start_search(),
            KeyCode::Tab | KeyCode::Char('1') => app.switch_to(Screen::Pets),
            KeyCode::Char('2') => app.switch_to(Screen::Owners),
            KeyCode::F(1) | KeyCode::Char('?') => app.show_help(),
            KeyCode::Esc => {
                if !app.owners.search_query.is_empty() {
                    app.owners.update_search_query("");
                }
            }
            _ => {}
        }
    }

    fn handle_add_pet_dialog(app: &mut App, key: KeyCode) {
        let Some(form) = app.pets.add_dialog.form() else {
            return;
        };
        let has_owner = form.has_owner;
        let dropdown_expanded = form.type_dropdown_expanded;

        if dropdown_expanded {
            return Self::handle_type_dropdown(app, key);
        }

        match key {
            KeyCode::Esc => app.pets.add_dialog.hide(),
            KeyCode::Tab | KeyCode::Down => {
                app.add_pet_focus = app.add_pet_focus.next(has_owner);
            }
            KeyCode::BackTab | KeyCode::Up => {
                app.add_pet_focus = app.add_pet_focus.previous(has_owner);
            }
            KeyCode::Enter => match app.add_pet_focus {
                AddPetField::Type => Self::expand_type_dropdown(app),
                _ => {
                    if let Some(name) = app.pets.submit_add(&app.store) {
                        app.status_message = Some(format!("Registered {}", name));
                    }
                }
            },
            KeyCode::Backspace => match app.add_pet_focus {
                AddPetField::Name => {
                    let mut name = Self::form_text(app, AddPetField::Name);
                    name.pop();
                    app.pets.add_dialog.update_pet_name(&name);
                }
                AddPetField::Age => {
                    let mut age = Self::form_text(app, AddPetField::Age);
                    age.pop();
                    app.pets.add_dialog.update_pet_age(&age);
                }
                AddPetField::OwnerName => {
                    let mut owner = Self::form_text(app, AddPetField::OwnerName);
                    owner.pop();
                    app.pets.add_dialog.update_owner_name(&owner);
                }
                AddPetField::Type | AddPetField::HasOwner => {}
            },
            KeyCode::Char(c) => match app.add_pet_focus {
                AddPetField::Name => {
                    let mut name = Self::form_text(app, AddPetField::Name);
                    name.push(c);
                    app.pets.add_dialog.update_pet_name(&name);
                }
                AddPetField::Age => {
                    let mut age = Self::form_text(app, AddPetField::Age);
                    age.push(c);
                    app.pets.add_dialog.update_pet_age(&age);
                }
                AddPetField::OwnerName => {
                    let mut owner = Self::form_text(app, AddPetField::OwnerName);
                    owner.push(c);
                    app.pets.add_dialog.update_owner_name(&owner);
                }
                AddPetField::HasOwner if c == ' ' => {
                    app.pets.add_dialog.update_has_owner(!has_owner);
                }
                AddPetField::Type if c == ' ' => Self::expand_type_dropdown(app),
                AddPetField::Type | AddPetField::HasOwner => {}
            },
            _ => {}
        }
    }

    /// Current text of an add-form text field, for append/pop editing.
    fn form_text(app: &App, field: AddPetField) -> String {
        let Some(form) = app.pets.add_dialog.form() else {
            return String::new();
        };
        match field {
            AddPetField::Name => form.pet_name.clone(),
            AddPetField::Age => form.age_text(),
            AddPetField::OwnerName => form.owner_name.clone(),
            AddPetField::Type | AddPetField::HasOwner => String::new(),
        }
    }

    fn expand_type_dropdown(app: &mut App) {
        // Highlight the already-chosen type, if any.
        app.type_menu_index = app
            .pets
            .add_dialog
            .form()
            .and_then(|form| form.pet_type.as_ref())
            .and_then(|chosen| app.pets.pet_types.iter().position(|t| t.id == chosen.id))
            .unwrap_or(0);
        app.pets.add_dialog.update_type_dropdown_expanded(true);
    }

    fn handle_type_dropdown(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                app.type_menu_index = app.type_menu_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.type_menu_index + 1 < app.pets.pet_types.len() {
                    app.type_menu_index += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(pet_type) = app.pets.pet_types.get(app.type_menu_index).cloned() {
                    app.pets.add_dialog.update_pet_type(pet_type);
                }
            }
            KeyCode::Esc => app.pets.add_dialog.update_type_dropdown_expanded(false),
            _ => {}
        }
    }

    fn handle_remove_pet_dialog(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('y') => {
                if let Some(name) = app.pets.confirm_remove(&app.store) {
                    app.status_message = Some(format!("Unregistered {}", name));
                }
            }
            KeyCode::Esc | KeyCode::Char('n') => app.pets.cancel_remove(),
            _ => {}
        }
    }

    fn handle_remove_owner_dialog(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('y') => {
                if let Some(name) = app.owners.confirm_remove(&app.store) {
                    app.status_message = Some(format!("Unregistered {}", name));
                }
            }
            KeyCode::Esc | KeyCode::Char('n') => app.owners.cancel_remove(),
            _ => {}
        }
    }

    fn handle_edit_owner_dialog(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                if let Some(name) = app.owners.save_edit(&app.store) {
                    app.status_message = Some(format!("Renamed owner to {}", name));
                }
            }
            KeyCode::Esc => app.owners.cancel_edit(),
            KeyCode::Backspace => {
                let mut name = app
                    .owners
                    .edit_dialog
                    .provisional_name()
                    .unwrap_or_default()
                    .to_string();
                name.pop();
                app.owners.edit_dialog.update_name(&name);
            }
            KeyCode::Char(c) => {
                let mut name = app
                    .owners
                    .edit_dialog
                    .provisional_name()
                    .unwrap_or_default()
                    .to_string();
                name.push(c);
                app.owners.edit_dialog.update_name(&name);
            }
            _ => {}
        }
    }

    fn handle_search_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_search(),
            KeyCode::Esc => app.cancel_search(),
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    let mut query = app.active_search_query().to_string();
                    let start = prev_char_start(&query, app.cursor_position);
                    query.remove(start);
                    app.cursor_position = start;
                    app.set_active_search_query(&query);
                }
            }
            KeyCode::Delete => {
                let mut query = app.active_search_query().to_string();
                if app.cursor_position < query.len() {
                    query.remove(app.cursor_position);
                    app.set_active_search_query(&query);
                }
            }
            KeyCode::Left => {
                app.cursor_position =
                    prev_char_start(app.active_search_query(), app.cursor_position);
            }
            KeyCode::Right => {
                app.cursor_position =
                    next_char_end(app.active_search_query(), app.cursor_position);
            }
            KeyCode::Home => app.cursor_position = 0,
            KeyCode::End => app.cursor_position = app.active_search_query().len(),
            KeyCode::Char(c) => {
                let mut query = app.active_search_query().to_string();
                query.insert(app.cursor_position, c);
                app.cursor_position += c.len_utf8();
                app.set_active_search_query(&query);
            }
            _ => {}
        }
    }

    fn handle_export_filename_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                let filename = app.export_filename();
                let result = match app.screen {
                    Screen::Pets => CsvExporter::export_pets(&app.pets.pets, &filename),
                    Screen::Owners => CsvExporter::export_owners(&app.owners.owners, &filename),
                };
                app.set_export_result(result);
            }
            KeyCode::Esc => app.cancel_export(),
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    let start = prev_char_start(&app.filename_input, app.cursor_position);
                    app.filename_input.remove(start);
                    app.cursor_position = start;
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < app.filename_input.len() {
                    app.filename_input.remove(app.cursor_position);
                }
            }
            KeyCode::Left => {
                app.cursor_position = prev_char_start(&app.filename_input, app.cursor_position);
            }
            KeyCode::Right => {
                app.cursor_position = next_char_end(&app.filename_input, app.cursor_position);
            }
            KeyCode::Home => app.cursor_position = 0,
            KeyCode::End => app.cursor_position = app.filename_input.len(),
            KeyCode::Char(c) => {
                app.filename_input.insert(app.cursor_position, c);
                app.cursor_position += c.len_utf8();
            }
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => app.help_scroll += 1,
            KeyCode::PageUp => app.help_scroll = app.help_scroll.saturating_sub(5),
            KeyCode::PageDown => app.help_scroll += 5,
            KeyCode::Home => app.help_scroll = 0,
            _ => {}
        }
    }
}
