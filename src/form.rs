//! The add/edit form: a draft plus the record it targets, if any.

use crate::domain::{UserDraft, UserId, UserRecord};

/// Which record, if any, a submit will write to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Creating,
    Editing(UserId),
}

/// What a submit asks the record store to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(UserDraft),
    Update(UserId, UserDraft),
}

#[derive(Debug, Clone, Default)]
pub struct FormController {
    draft: UserDraft,
    mode: FormMode,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &UserDraft {
        &self.draft
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn editing_id(&self) -> Option<&UserId> {
        match &self.mode {
            FormMode::Editing(id) => Some(id),
            FormMode::Creating => None,
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.mode {
            FormMode::Creating => "Add New User",
            FormMode::Editing(_) => "Edit User",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Creating => "Add",
            FormMode::Editing(_) => "Update",
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.draft.email = email.into();
    }

    /// Copies the record's fields into the draft and targets it. Allowed
    /// while already editing another record.
    pub fn begin_edit(&mut self, record: &UserRecord) {
        self.draft = record.fields();
        self.mode = FormMode::Editing(record.id.clone());
    }

    /// Back to an empty create form.
    pub fn clear(&mut self) {
        self.draft = UserDraft::default();
        self.mode = FormMode::Creating;
    }

    /// The store call a submit should make, or `None` when a field is empty
    /// and the submit must be ignored.
    pub fn submission(&self) -> Option<Submission> {
        if !self.draft.is_complete() {
            return None;
        }
        let draft = self.draft.clone();
        Some(match &self.mode {
            FormMode::Creating => Submission::Create(draft),
            FormMode::Editing(id) => Submission::Update(id.clone(), draft),
        })
    }
}
