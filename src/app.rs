//! Application state and key dispatch: which panel has focus, the form state
//! machine (creating vs. editing), the search term, and the modal prompts
//! that gate destructive operations.

use crate::error::Error;
use crate::store::TaskStore;
use crate::task::{Task, TaskDraft, TASK_KINDS};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Default color of a fresh form, matching an untouched color picker.
pub const DEFAULT_COLOR: &str = "#000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Form,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Kind,
    Description,
    Color,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            Self::Name => Self::Kind,
            Self::Kind => Self::Description,
            Self::Description => Self::Color,
            Self::Color => Self::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Name => Self::Color,
            Self::Kind => Self::Name,
            Self::Description => Self::Kind,
            Self::Color => Self::Description,
        }
    }
}

/// The single form instance. `editing` holds the target task id while in
/// the editing state and is `None` while creating.
#[derive(Debug)]
pub struct Form {
    pub editing: Option<String>,
    pub name: String,
    pub kind: String,
    pub description: String,
    pub color: String,
    pub field: FormField,
}

impl Form {
    fn new() -> Self {
        Self {
            editing: None,
            name: String::new(),
            kind: String::new(),
            description: String::new(),
            color: DEFAULT_COLOR.to_string(),
            field: FormField::Name,
        }
    }

    /// Back to the creating state: all fields cleared, target id dropped.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Enter the editing state with this task's data loaded.
    pub fn load(&mut self, task: &Task) {
        self.editing = Some(task.id.clone());
        self.name = task.name.clone();
        self.kind = task.kind.clone();
        self.description = task.description.clone();
        self.color = task.color.clone();
        self.field = FormField::Name;
    }

    /// Label for the submit action, reflecting create vs. update semantics.
    pub fn submit_label(&self) -> &'static str {
        if self.editing.is_some() {
            "Update Task"
        } else {
            "Save Task"
        }
    }

    pub fn draft(&self) -> TaskDraft {
        TaskDraft {
            name: self.name.clone(),
            kind: self.kind.clone(),
            description: self.description.clone(),
            color: self.color.clone(),
        }
    }

    fn cycle_kind(&mut self, forward: bool) {
        let next = match TASK_KINDS.iter().position(|k| *k == self.kind) {
            None => 0,
            Some(i) if forward => (i + 1) % TASK_KINDS.len(),
            Some(i) => (i + TASK_KINDS.len() - 1) % TASK_KINDS.len(),
        };
        self.kind = TASK_KINDS[next].to_string();
    }

    fn active_text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Name => Some(&mut self.name),
            FormField::Kind => None,
            FormField::Description => Some(&mut self.description),
            FormField::Color => Some(&mut self.color),
        }
    }
}

/// What a pending confirmation will do once accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask(String),
    ClearAll,
}

/// A blocking popup: either an alert dismissed by any key, or a yes/no
/// confirmation gating a destructive action.
#[derive(Debug, PartialEq, Eq)]
pub enum Modal {
    Alert(String),
    Confirm { action: ConfirmAction, message: String },
}

#[derive(Debug)]
pub struct App {
    pub store: TaskStore,
    pub form: Form,
    pub focus: Focus,
    pub search: String,
    pub selected: usize,
    pub modal: Option<Modal>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            form: Form::new(),
            focus: Focus::List,
            search: String::new(),
            selected: 0,
            modal: None,
            should_quit: false,
        }
    }

    /// The tasks currently shown: the full collection, or the search subset
    /// when a term is active.
    pub fn visible(&self) -> Vec<&Task> {
        self.store.search(&self.search)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.modal.is_some() {
            self.handle_modal_key(key.code);
            return;
        }
        match self.focus {
            Focus::List => self.handle_list_key(key.code),
            Focus::Form => self.handle_form_key(key.code),
            Focus::Search => self.handle_search_key(key.code),
        }
    }

    fn handle_modal_key(&mut self, code: KeyCode) {
        let Some(modal) = self.modal.take() else { return };
        match modal {
            // Any key dismisses an alert.
            Modal::Alert(_) => {}
            Modal::Confirm { action, .. } => match code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.run_confirmed(action),
                // Anything else declines: no side effects.
                _ => {}
            },
        }
    }

    fn run_confirmed(&mut self, action: ConfirmAction) {
        let result = match action {
            ConfirmAction::DeleteTask(id) => self.store.delete(&id).map(|_| ()),
            ConfirmAction::ClearAll => self.store.clear_all(),
        };
        if let Err(err) = result {
            tracing::error!(%err, "failed to persist tasks");
        }
        self.clamp_selection();
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.visible().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('n') => {
                self.form.reset();
                self.focus = Focus::Form;
            }
            KeyCode::Char('e') | KeyCode::Enter => self.edit_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.request_delete_selected(),
            KeyCode::Char('c') => self.request_clear_all(),
            KeyCode::Char('/') => self.focus = Focus::Search,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        match code {
            // The explicit clear-form action: back to creating.
            KeyCode::Esc => {
                self.form.reset();
                self.focus = Focus::List;
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::Down => self.form.field = self.form.field.next(),
            KeyCode::BackTab | KeyCode::Up => self.form.field = self.form.field.prev(),
            KeyCode::Left if self.form.field == FormField::Kind => self.form.cycle_kind(false),
            KeyCode::Right if self.form.field == FormField::Kind => self.form.cycle_kind(true),
            KeyCode::Char(c) => {
                if let Some(text) = self.form.active_text_mut() {
                    text.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(text) = self.form.active_text_mut() {
                    text.pop();
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.search.clear();
                self.selected = 0;
                self.focus = Focus::List;
            }
            KeyCode::Enter => self.focus = Focus::List,
            KeyCode::Char(c) => {
                self.search.push(c);
                self.selected = 0;
            }
            KeyCode::Backspace => {
                self.search.pop();
                self.selected = 0;
            }
            _ => {}
        }
    }

    /// Validate and create or update, then return the form to the creating
    /// state. A validation failure alerts and leaves everything untouched.
    fn submit(&mut self) {
        let draft = self.form.draft();
        if draft.missing_field().is_some() {
            self.modal = Some(Modal::Alert("Please enter task name and select type".to_string()));
            return;
        }
        let result = match self.form.editing.clone() {
            // An update whose target id vanished is a silent no-op.
            Some(id) => self.store.update(&id, draft).map(|_| ()),
            None => self.store.create(draft).map(|_| ()),
        };
        if let Err(err) = result {
            match err {
                Error::EmptyField(_) => {
                    self.modal = Some(Modal::Alert("Please enter task name and select type".to_string()));
                    return;
                }
                err => tracing::error!(%err, "failed to persist tasks"),
            }
        }
        self.form.reset();
        self.focus = Focus::List;
        self.clamp_selection();
    }

    fn edit_selected(&mut self) {
        let Some(task) = self.visible().get(self.selected).map(|t| (*t).clone()) else {
            return;
        };
        self.form.load(&task);
        // The TUI equivalent of scrolling the form into view.
        self.focus = Focus::Form;
    }

    fn request_delete_selected(&mut self) {
        let Some(id) = self.visible().get(self.selected).map(|t| t.id.clone()) else {
            return;
        };
        self.modal = Some(Modal::Confirm {
            action: ConfirmAction::DeleteTask(id),
            message: "Are you sure you want to delete this task?".to_string(),
        });
    }

    fn request_clear_all(&mut self) {
        if self.store.is_empty() {
            self.modal = Some(Modal::Alert("No tasks to clear".to_string()));
            return;
        }
        self.modal = Some(Modal::Confirm {
            action: ConfirmAction::ClearAll,
            message: "Are you sure you want to delete all tasks?".to_string(),
        });
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Storage, STORAGE_FILENAME};
    use crate::task::needs_light_text;
    use tempfile::TempDir;

    fn new_app(dir: &TempDir) -> App {
        App::new(TaskStore::open(Storage::new(dir.path().join(STORAGE_FILENAME))))
    }

    fn key(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::from(code));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            key(app, KeyCode::Char(c));
        }
    }

    /// Fill and submit the form for a fresh task. Leaves the kind on
    /// "Errand" (three steps right from the empty selection).
    fn create_errand(app: &mut App, name: &str) {
        key(app, KeyCode::Char('n'));
        type_text(app, name);
        key(app, KeyCode::Tab);
        key(app, KeyCode::Right); // Work
        key(app, KeyCode::Right); // Personal
        key(app, KeyCode::Right); // Errand
        key(app, KeyCode::Enter);
    }

    #[test]
    fn test_form_starts_creating() {
        let dir = tempfile::tempdir().unwrap();
        let app = new_app(&dir);
        assert!(app.form.editing.is_none());
        assert_eq!(app.form.submit_label(), "Save Task");
        assert_eq!(app.form.color, DEFAULT_COLOR);
    }

    #[test]
    fn test_submit_without_name_alerts_and_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);

        key(&mut app, KeyCode::Char('n'));
        key(&mut app, KeyCode::Enter);

        assert!(matches!(app.modal, Some(Modal::Alert(_))));
        assert!(app.store.is_empty());
        // Still in the form, nothing cleared.
        assert_eq!(app.focus, Focus::Form);

        // Any key dismisses the alert.
        key(&mut app, KeyCode::Char('x'));
        assert!(app.modal.is_none());
    }

    #[test]
    fn test_submit_without_kind_alerts() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);

        key(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Buy milk");
        key(&mut app, KeyCode::Enter);

        assert!(matches!(app.modal, Some(Modal::Alert(_))));
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_create_update_delete_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);

        // Create {name: "Buy milk", type: "Errand", color: "#000000"}.
        create_errand(&mut app, "Buy milk");
        assert_eq!(app.store.tasks().len(), 1);
        let task = &app.store.tasks()[0];
        assert_eq!(task.name, "Buy milk");
        assert_eq!(task.kind, "Errand");
        assert_eq!(task.color, "#000000");
        // Black card gets white text.
        assert!(needs_light_text(&task.color));
        let id = task.id.clone();

        // Successful submit returned the form to creating.
        assert!(app.form.editing.is_none());
        assert_eq!(app.focus, Focus::List);

        // Edit: same id, new name, white background.
        key(&mut app, KeyCode::Char('e'));
        assert_eq!(app.focus, Focus::Form);
        assert_eq!(app.form.editing.as_deref(), Some(id.as_str()));
        assert_eq!(app.form.submit_label(), "Update Task");
        assert_eq!(app.form.name, "Buy milk");

        type_text(&mut app, " and eggs");
        // Move to the color field and replace the value.
        key(&mut app, KeyCode::Tab);
        key(&mut app, KeyCode::Tab);
        key(&mut app, KeyCode::Tab);
        assert_eq!(app.form.field, FormField::Color);
        for _ in 0.."#000000".len() {
            key(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "#ffffff");
        key(&mut app, KeyCode::Enter);

        assert_eq!(app.store.tasks().len(), 1);
        let task = &app.store.tasks()[0];
        assert_eq!(task.id, id);
        assert_eq!(task.name, "Buy milk and eggs");
        // White card now uses the default dark text.
        assert!(!needs_light_text(&task.color));

        // Delete with confirmation accepted: collection empty.
        key(&mut app, KeyCode::Char('d'));
        assert!(matches!(app.modal, Some(Modal::Confirm { .. })));
        key(&mut app, KeyCode::Char('y'));
        assert!(app.store.is_empty());
        assert!(app.visible().is_empty());
    }

    #[test]
    fn test_delete_declined_has_no_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        create_errand(&mut app, "Buy milk");

        key(&mut app, KeyCode::Char('d'));
        key(&mut app, KeyCode::Char('n'));
        assert!(app.modal.is_none());
        assert_eq!(app.store.tasks().len(), 1);
    }

    #[test]
    fn test_clear_all_on_empty_is_a_no_op_with_alert() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);

        key(&mut app, KeyCode::Char('c'));
        match &app.modal {
            Some(Modal::Alert(msg)) => assert_eq!(msg, "No tasks to clear"),
            other => panic!("expected alert, got {other:?}"),
        }
    }

    #[test]
    fn test_clear_all_confirmed_empties_everything() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        create_errand(&mut app, "one");
        create_errand(&mut app, "two");

        key(&mut app, KeyCode::Char('c'));
        assert!(matches!(app.modal, Some(Modal::Confirm { .. })));
        key(&mut app, KeyCode::Enter);
        assert!(app.store.is_empty());
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_escape_clears_form_back_to_creating() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        create_errand(&mut app, "Buy milk");

        key(&mut app, KeyCode::Char('e'));
        assert!(app.form.editing.is_some());

        key(&mut app, KeyCode::Esc);
        assert!(app.form.editing.is_none());
        assert!(app.form.name.is_empty());
        assert_eq!(app.form.submit_label(), "Save Task");
        assert_eq!(app.focus, Focus::List);
    }

    #[test]
    fn test_search_filters_visible_and_edit_targets_the_match() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        create_errand(&mut app, "Buy milk");
        create_errand(&mut app, "Call bank");
        create_errand(&mut app, "Buy eggs");

        key(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "bank");
        assert_eq!(app.visible().len(), 1);
        key(&mut app, KeyCode::Enter);

        // Delete acts on the filtered selection, not the raw index.
        key(&mut app, KeyCode::Char('d'));
        key(&mut app, KeyCode::Char('y'));
        let names: Vec<&str> = app.store.tasks().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Buy milk", "Buy eggs"]);

        // Clearing the term restores the full list.
        key(&mut app, KeyCode::Char('/'));
        key(&mut app, KeyCode::Esc);
        assert_eq!(app.visible().len(), 2);
    }

    #[test]
    fn test_kind_cycles_through_fixed_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        key(&mut app, KeyCode::Char('n'));
        key(&mut app, KeyCode::Tab);
        assert_eq!(app.form.field, FormField::Kind);

        key(&mut app, KeyCode::Right);
        assert_eq!(app.form.kind, TASK_KINDS[0]);
        key(&mut app, KeyCode::Left);
        assert_eq!(app.form.kind, TASK_KINDS[TASK_KINDS.len() - 1]);

        // Typed characters never land in the kind field.
        type_text(&mut app, "junk");
        assert_eq!(app.form.kind, TASK_KINDS[TASK_KINDS.len() - 1]);
    }

    #[test]
    fn test_update_with_vanished_id_resets_form_silently() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        create_errand(&mut app, "Buy milk");

        key(&mut app, KeyCode::Char('e'));
        app.form.editing = Some("no-such-id".to_string());
        key(&mut app, KeyCode::Enter);

        assert!(app.modal.is_none());
        assert!(app.form.editing.is_none());
        assert_eq!(app.store.tasks()[0].name, "Buy milk");
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        create_errand(&mut app, "one");
        create_errand(&mut app, "two");

        key(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 1);
        key(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 1);

        key(&mut app, KeyCode::Char('d'));
        key(&mut app, KeyCode::Char('y'));
        assert_eq!(app.selected, 0);
        key(&mut app, KeyCode::Up);
        assert_eq!(app.selected, 0);
    }
}
