//! Dialog state machines for the add/edit/remove flows.
//!
//! Every dialog is a tagged variant: `Hidden`, or `Visible` carrying the
//! in-progress form fields. Operations that only make sense while visible
//! are no-ops from `Hidden` rather than errors, so callers never have to
//! check the state first. Validation failures never escape as errors
//! either; they are per-field warning flags the view renders.

use crate::domain::{Owner, OwnerId, Pet, PetDraft, PetType};

/// In-progress fields of the add-pet form.
///
/// Each warning flag is recomputed from the current field values at
/// submission time and cleared the moment its field is edited again.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddPetForm {
    pub pet_name: String,
    pub pet_age: Option<i32>,
    pub pet_type: Option<PetType>,
    pub has_owner: bool,
    pub owner_name: String,
    pub type_dropdown_expanded: bool,
    pub pet_name_warning: bool,
    pub pet_age_warning: bool,
    pub pet_type_warning: bool,
    pub owner_name_warning: bool,
}

impl AddPetForm {
    pub fn has_warning(&self) -> bool {
        self.pet_name_warning
            || self.pet_age_warning
            || self.pet_type_warning
            || self.owner_name_warning
    }

    /// The age field's current text, as the view should display it.
    pub fn age_text(&self) -> String {
        self.pet_age.map(|age| age.to_string()).unwrap_or_default()
    }
}

/// State of the add-pet dialog.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AddPetDialogState {
    #[default]
    Hidden,
    Visible(AddPetForm),
}

impl AddPetDialogState {
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible(_))
    }

    pub fn form(&self) -> Option<&AddPetForm> {
        match self {
            Self::Visible(form) => Some(form),
            Self::Hidden => None,
        }
    }

    fn update_visible(&mut self, update: impl FnOnce(&mut AddPetForm)) {
        if let Self::Visible(form) = self {
            update(form);
        }
    }

    /// Opens the dialog with a fresh, empty form. No-op when already open,
    /// so a second show cannot wipe half-entered fields.
    pub fn show(&mut self) {
        if matches!(self, Self::Hidden) {
            *self = Self::Visible(AddPetForm::default());
        }
    }

    /// Closes the dialog, discarding any provisional input.
    pub fn hide(&mut self) {
        if self.is_visible() {
            *self = Self::Hidden;
        }
    }

    pub fn update_pet_name(&mut self, name: &str) {
        self.update_visible(|form| {
            form.pet_name = name.to_string();
            form.pet_name_warning = false;
        });
    }

    /// Applies free-form text input to the age field.
    ///
    /// Empty text unsets the age; non-numeric non-empty text is silently
    /// rejected and the previous value kept. Editing always clears the age
    /// warning, even on a rejected keystroke.
    pub fn update_pet_age(&mut self, input: &str) {
        self.update_visible(|form| {
            form.pet_age = match input {
                "" => None,
                _ => input.parse::<i32>().ok().or(form.pet_age),
            };
            form.pet_age_warning = false;
        });
    }

    /// Chooses a pet type and collapses the type dropdown.
    pub fn update_pet_type(&mut self, pet_type: PetType) {
        self.update_visible(|form| {
            form.pet_type = Some(pet_type);
            form.pet_type_warning = false;
            form.type_dropdown_expanded = false;
        });
    }

    pub fn update_type_dropdown_expanded(&mut self, expanded: bool) {
        self.update_visible(|form| form.type_dropdown_expanded = expanded);
    }

    /// Sets the "has owner" flag. Unsetting it makes the owner fields
    /// irrelevant, so the owner name and its warning are cleared too.
    pub fn update_has_owner(&mut self, has_owner: bool) {
        self.update_visible(|form| {
            form.has_owner = has_owner;
            if !has_owner {
                form.owner_name.clear();
                form.owner_name_warning = false;
            }
        });
    }

    pub fn update_owner_name(&mut self, name: &str) {
        self.update_visible(|form| {
            form.owner_name = name.to_string();
            form.owner_name_warning = false;
        });
    }

    /// Validates the form and, if everything passes, yields the draft to
    /// persist and transitions to `Hidden`.
    ///
    /// On any failing field the dialog stays `Visible` with exactly the
    /// failing fields' warnings set, and nothing is returned. Warnings are
    /// recomputed from scratch on every attempt. No-op from `Hidden`.
    pub fn submit(&mut self) -> Option<PetDraft> {
        let Self::Visible(form) = self else {
            return None;
        };

        form.pet_name_warning = form.pet_name.trim().is_empty();
        form.pet_age_warning = form.pet_age.is_none();
        form.pet_type_warning = form.pet_type.is_none();
        form.owner_name_warning = form.has_owner && form.owner_name.trim().is_empty();
        if form.has_warning() {
            return None;
        }

        let (Some(age), Some(pet_type)) = (form.pet_age, form.pet_type.as_ref()) else {
            return None;
        };
        let draft = PetDraft {
            name: form.pet_name.clone(),
            age,
            type_id: pet_type.id,
            owner_name: form.has_owner.then(|| form.owner_name.clone()),
        };
        *self = Self::Hidden;
        Some(draft)
    }
}

/// State of a remove-confirmation dialog, generic over what is being
/// removed. Used with [`Pet`] on the pets screen and [`Owner`] on the
/// owners screen.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveDialogState<T> {
    Hidden,
    Visible {
        target: T,
    },
}

// Derived `Default` would demand `T: Default`; `Hidden` needs no target.
impl<T> Default for RemoveDialogState<T> {
    fn default() -> Self {
        Self::Hidden
    }
}

impl<T> RemoveDialogState<T> {
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible { .. })
    }

    pub fn target(&self) -> Option<&T> {
        match self {
            Self::Visible { target } => Some(target),
            Self::Hidden => None,
        }
    }

    /// Opens the dialog for the given target. Any veto rule (such as
    /// refusing owners that still have pets) is the caller's to enforce
    /// before getting here.
    pub fn initiate(&mut self, target: T) {
        *self = Self::Visible { target };
    }

    /// Closes the dialog, dropping the held reference.
    pub fn cancel(&mut self) {
        *self = Self::Hidden;
    }

    /// Yields the confirmed target and unconditionally hides the dialog.
    /// Returns `None` from `Hidden`.
    pub fn take_confirmed(&mut self) -> Option<T> {
        match std::mem::take(self) {
            Self::Visible { target } => Some(target),
            Self::Hidden => None,
        }
    }
}

/// State of the edit-owner dialog.
///
/// Carries the owner being edited plus the provisional name. There is no
/// validation on save; a blank name is accepted, matching the add-pet
/// owner-creation policy's permissiveness on rename.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditOwnerDialogState {
    #[default]
    Hidden,
    Visible {
        owner: Owner,
        name: String,
    },
}

impl EditOwnerDialogState {
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible { .. })
    }

    pub fn owner(&self) -> Option<&Owner> {
        match self {
            Self::Visible { owner, .. } => Some(owner),
            Self::Hidden => None,
        }
    }

    pub fn provisional_name(&self) -> Option<&str> {
        match self {
            Self::Visible { name, .. } => Some(name),
            Self::Hidden => None,
        }
    }

    /// Opens the dialog seeded with the owner's current name.
    pub fn initiate(&mut self, owner: Owner) {
        let name = owner.name.clone();
        *self = Self::Visible { owner, name };
    }

    pub fn update_name(&mut self, new_name: &str) {
        if let Self::Visible { name, .. } = self {
            *name = new_name.to_string();
        }
    }

    /// Yields the `(id, provisional name)` to persist and hides the dialog.
    pub fn save(&mut self) -> Option<(OwnerId, String)> {
        match std::mem::take(self) {
            Self::Visible { owner, name } => Some((owner.id, name)),
            Self::Hidden => None,
        }
    }

    /// Discards provisional changes and hides the dialog.
    pub fn cancel(&mut self) {
        *self = Self::Hidden;
    }
}

/// Convenience alias for the pets screen's remove dialog.
pub type RemovePetDialogState = RemoveDialogState<Pet>;
/// Convenience alias for the owners screen's remove dialog.
pub type RemoveOwnerDialogState = RemoveDialogState<Owner>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PetId, PetTypeId};

    fn dog() -> PetType {
        PetType {
            id: PetTypeId::new(),
            name: "Dog".to_string(),
        }
    }

    fn visible_form(state: &AddPetDialogState) -> &AddPetForm {
        state.form().expect("dialog should be visible")
    }

    fn filled_dialog() -> AddPetDialogState {
        let mut dialog = AddPetDialogState::default();
        dialog.show();
        dialog.update_pet_name("Rex");
        dialog.update_pet_age("3");
        dialog.update_pet_type(dog());
        dialog
    }

    #[test]
    fn test_show_only_from_hidden() {
        let mut dialog = AddPetDialogState::default();
        dialog.show();
        dialog.update_pet_name("Rex");

        // A second show must not reset the provisional fields.
        dialog.show();
        assert_eq!(visible_form(&dialog).pet_name, "Rex");
    }

    #[test]
    fn test_hide_discards_fields() {
        let mut dialog = filled_dialog();
        dialog.hide();
        assert_eq!(dialog, AddPetDialogState::Hidden);

        dialog.show();
        assert_eq!(visible_form(&dialog), &AddPetForm::default());
    }

    #[test]
    fn test_field_updates_are_noops_while_hidden() {
        let mut dialog = AddPetDialogState::default();
        dialog.update_pet_name("Rex");
        dialog.update_pet_age("3");
        dialog.update_pet_type(dog());
        dialog.update_has_owner(true);
        dialog.update_owner_name("Ana");
        dialog.update_type_dropdown_expanded(true);
        assert_eq!(dialog, AddPetDialogState::Hidden);
        assert!(dialog.submit().is_none());
    }

    #[test]
    fn test_age_input_parsing() {
        let mut dialog = AddPetDialogState::default();
        dialog.show();

        dialog.update_pet_age("12");
        assert_eq!(visible_form(&dialog).pet_age, Some(12));

        // Non-numeric input is silently rejected, previous value kept.
        dialog.update_pet_age("abc");
        assert_eq!(visible_form(&dialog).pet_age, Some(12));

        dialog.update_pet_age("");
        assert_eq!(visible_form(&dialog).pet_age, None);

        dialog.update_pet_age("abc");
        assert_eq!(visible_form(&dialog).pet_age, None);
    }

    #[test]
    fn test_each_update_clears_its_warning() {
        let mut dialog = AddPetDialogState::default();
        dialog.show();
        dialog.update_has_owner(true);

        // All four validations fail.
        assert!(dialog.submit().is_none());
        let form = visible_form(&dialog);
        assert!(form.pet_name_warning);
        assert!(form.pet_age_warning);
        assert!(form.pet_type_warning);
        assert!(form.owner_name_warning);

        dialog.update_pet_name("Rex");
        assert!(!visible_form(&dialog).pet_name_warning);

        dialog.update_pet_age("3");
        assert!(!visible_form(&dialog).pet_age_warning);

        dialog.update_pet_type(dog());
        assert!(!visible_form(&dialog).pet_type_warning);

        dialog.update_owner_name("Ana");
        assert!(!visible_form(&dialog).owner_name_warning);
    }

    #[test]
    fn test_unset_has_owner_clears_owner_fields() {
        let mut dialog = AddPetDialogState::default();
        dialog.show();
        dialog.update_has_owner(true);
        dialog.update_owner_name("   ");
        assert!(dialog.submit().is_none());
        assert!(visible_form(&dialog).owner_name_warning);

        dialog.update_has_owner(false);
        let form = visible_form(&dialog);
        assert_eq!(form.owner_name, "");
        assert!(!form.owner_name_warning);
        assert!(!form.has_owner);
    }

    #[test]
    fn test_submit_valid_yields_draft_and_hides() {
        let mut dialog = filled_dialog();
        let type_id = visible_form(&dialog).pet_type.as_ref().unwrap().id;

        let draft = dialog.submit().expect("valid form should submit");
        assert_eq!(draft.name, "Rex");
        assert_eq!(draft.age, 3);
        assert_eq!(draft.type_id, type_id);
        assert!(draft.owner_name.is_none());
        assert_eq!(dialog, AddPetDialogState::Hidden);
    }

    #[test]
    fn test_submit_with_owner_carries_owner_name() {
        let mut dialog = filled_dialog();
        dialog.update_has_owner(true);
        dialog.update_owner_name("Ana");

        let draft = dialog.submit().expect("valid form should submit");
        assert_eq!(draft.owner_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_submit_invalid_sets_exactly_the_failing_warnings() {
        let mut dialog = AddPetDialogState::default();
        dialog.show();
        dialog.update_pet_name("Rex");

        assert!(dialog.submit().is_none());
        let form = visible_form(&dialog);
        assert!(!form.pet_name_warning);
        assert!(form.pet_age_warning);
        assert!(form.pet_type_warning);
        assert!(!form.owner_name_warning); // has_owner unset, owner irrelevant
        assert!(dialog.is_visible());
    }

    #[test]
    fn test_submit_blank_name_warns() {
        let mut dialog = filled_dialog();
        dialog.update_pet_name("   ");

        assert!(dialog.submit().is_none());
        assert!(visible_form(&dialog).pet_name_warning);
        assert!(dialog.is_visible());
    }

    #[test]
    fn test_warnings_recomputed_fresh_each_submit() {
        let mut dialog = AddPetDialogState::default();
        dialog.show();
        assert!(dialog.submit().is_none());
        assert!(visible_form(&dialog).pet_name_warning);

        // Fix only the name; the next submit must not carry the old name
        // warning, and must still flag the remaining fields.
        dialog.update_pet_name("Rex");
        assert!(dialog.submit().is_none());
        let form = visible_form(&dialog);
        assert!(!form.pet_name_warning);
        assert!(form.pet_age_warning);
        assert!(form.pet_type_warning);
    }

    #[test]
    fn test_type_dropdown_collapses_on_selection() {
        let mut dialog = AddPetDialogState::default();
        dialog.show();
        dialog.update_type_dropdown_expanded(true);
        assert!(visible_form(&dialog).type_dropdown_expanded);

        dialog.update_pet_type(dog());
        assert!(!visible_form(&dialog).type_dropdown_expanded);
    }

    #[test]
    fn test_remove_dialog_lifecycle() {
        let mut dialog: RemovePetDialogState = RemoveDialogState::default();
        assert!(dialog.take_confirmed().is_none());

        let pet = Pet {
            id: PetId::new(),
            name: "Rex".to_string(),
            age: 3,
            pet_type: None,
            owner: None,
        };
        dialog.initiate(pet.clone());
        assert_eq!(dialog.target(), Some(&pet));

        let confirmed = dialog.take_confirmed().expect("target should be held");
        assert_eq!(confirmed, pet);
        assert!(!dialog.is_visible());
    }

    #[test]
    fn test_remove_dialog_cancel_drops_target() {
        let mut dialog: RemovePetDialogState = RemoveDialogState::default();
        dialog.initiate(Pet {
            id: PetId::new(),
            name: "Rex".to_string(),
            age: 3,
            pet_type: None,
            owner: None,
        });
        dialog.cancel();
        assert!(dialog.target().is_none());
        assert!(dialog.take_confirmed().is_none());
    }

    #[test]
    fn test_edit_owner_dialog_seeds_and_saves() {
        let owner = Owner {
            id: crate::domain::OwnerId::new(),
            name: "Ana".to_string(),
            pets: Vec::new(),
        };
        let mut dialog = EditOwnerDialogState::default();
        dialog.initiate(owner.clone());
        assert_eq!(dialog.provisional_name(), Some("Ana"));

        dialog.update_name("Anabel");
        let (id, name) = dialog.save().expect("visible dialog should save");
        assert_eq!(id, owner.id);
        assert_eq!(name, "Anabel");
        assert!(!dialog.is_visible());
    }

    #[test]
    fn test_edit_owner_dialog_cancel_discards() {
        let owner = Owner {
            id: crate::domain::OwnerId::new(),
            name: "Ana".to_string(),
            pets: Vec::new(),
        };
        let mut dialog = EditOwnerDialogState::default();
        dialog.initiate(owner);
        dialog.update_name("Anabel");
        dialog.cancel();
        assert!(dialog.save().is_none());
    }

    #[test]
    fn test_edit_owner_accepts_blank_name() {
        let owner = Owner {
            id: crate::domain::OwnerId::new(),
            name: "Ana".to_string(),
            pets: Vec::new(),
        };
        let mut dialog = EditOwnerDialogState::default();
        dialog.initiate(owner);
        dialog.update_name("");
        let (_, name) = dialog.save().expect("blank names are accepted");
        assert_eq!(name, "");
    }
}
