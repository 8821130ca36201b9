//! Headless page controllers for the three list views.
//!
//! Each page owns the state a renderer binds to and performs its actions
//! through the repository handle it was constructed with. After every
//! mutation the page awaits a full reload; nothing is updated optimistically.
//! Deletion asks a `confirm` callback first and does nothing if it declines.

use std::str::FromStr;
use std::sync::Arc;

use crate::entity::{Priority, contact, product, task};
use crate::query::{self, ContactQuery, ProductQuery, TaskFilter, UnknownOption};
use crate::repository::{CrudRepository, Direction, FindOptions, RepoError, Resource};
use crate::validation::{self, FieldErrors};

/// Top-level navigation: exactly one page is shown at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Tasks,
    Contacts,
    Products,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Tasks, Page::Contacts, Page::Products];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Tasks => "Tasks",
            Page::Contacts => "Contacts",
            Page::Products => "Products",
        }
    }
}

impl FromStr for Page {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tasks" => Ok(Page::Tasks),
            "contacts" => Ok(Page::Contacts),
            "products" => Ok(Page::Products),
            _ => Err(UnknownOption {
                kind: "page",
                value: s.to_string(),
            }),
        }
    }
}

/// In-progress edit of one task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

pub struct TasksPage {
    repo: Arc<dyn CrudRepository<task::Entity>>,
    tasks: Vec<task::Model>,
    filter: TaskFilter,
    editing: Option<TaskEdit>,
}

impl TasksPage {
    pub fn new(repo: Arc<dyn CrudRepository<task::Entity>>) -> Self {
        Self {
            repo,
            tasks: Vec::new(),
            filter: TaskFilter::All,
            editing: None,
        }
    }

    pub async fn load(&mut self) -> Result<(), RepoError> {
        self.tasks = self.repo.find(self.filter.find_options()).await?;
        Ok(())
    }

    pub fn tasks(&self) -> &[task::Model] {
        &self.tasks
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    /// Switch the filter and reload from the store.
    pub async fn set_filter(&mut self, filter: TaskFilter) -> Result<(), RepoError> {
        self.filter = filter;
        self.load().await
    }

    /// Incomplete tasks among those currently loaded.
    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    /// Placeholder text for an empty list.
    pub fn empty_message(&self) -> Option<String> {
        if !self.tasks.is_empty() {
            return None;
        }
        Some(match self.filter {
            TaskFilter::All => "No tasks yet. Add one above!".to_string(),
            other => format!("No {} tasks.", other.as_str()),
        })
    }

    /// Insert a task unless the title is blank. Title and description are
    /// trimmed.
    pub async fn add_task(
        &mut self,
        title: &str,
        description: &str,
        priority: Priority,
    ) -> Result<Option<task::Model>, RepoError> {
        let Some(title) = validation::require_title(title) else {
            return Ok(None);
        };
        let created = self
            .repo
            .insert(task::Draft {
                title: title.to_string(),
                description: description.trim().to_string(),
                completed: false,
                priority,
            })
            .await?;
        self.load().await?;
        Ok(Some(created))
    }

    pub async fn toggle_complete(&mut self, id: i32) -> Result<(), RepoError> {
        let current = self.loaded_or_fetch(id).await?;
        let mut draft = task::Entity::to_draft(&current);
        draft.completed = !draft.completed;
        self.repo.save(id, draft).await?;
        self.load().await
    }

    /// Open the edit form for a loaded task. Returns false if it is not in
    /// the current list.
    pub fn start_edit(&mut self, id: i32) -> bool {
        let Some(task) = self.tasks.iter().find(|t| t.id == id) else {
            return false;
        };
        self.editing = Some(TaskEdit {
            id,
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
        });
        true
    }

    pub fn editing(&self) -> Option<&TaskEdit> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut TaskEdit> {
        self.editing.as_mut()
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Save the open edit over the stored task, keeping its completion
    /// state. A blank title keeps the form open and saves nothing.
    pub async fn save_edit(&mut self) -> Result<bool, RepoError> {
        let Some(edit) = self.editing.clone() else {
            return Ok(false);
        };
        let Some(title) = validation::require_title(&edit.title) else {
            return Ok(false);
        };
        let current = self.loaded_or_fetch(edit.id).await?;
        let draft = task::Draft {
            title: title.to_string(),
            description: edit.description.trim().to_string(),
            completed: current.completed,
            priority: edit.priority,
        };
        self.repo.save(edit.id, draft).await?;
        self.editing = None;
        self.load().await?;
        Ok(true)
    }

    pub async fn delete_task(
        &mut self,
        id: i32,
        confirm: impl FnOnce() -> bool,
    ) -> Result<bool, RepoError> {
        if !confirm() {
            return Ok(false);
        }
        self.repo.delete(id).await?;
        self.load().await?;
        Ok(true)
    }

    async fn loaded_or_fetch(&self, id: i32) -> Result<task::Model, RepoError> {
        match self.tasks.iter().find(|t| t.id == id) {
            Some(task) => Ok(task.clone()),
            None => self.repo.get(id).await,
        }
    }
}

pub struct ContactsPage {
    repo: Arc<dyn CrudRepository<contact::Entity>>,
    contacts: Vec<contact::Model>,
    query: ContactQuery,
    show_form: bool,
    editing_id: Option<i32>,
    form: contact::Draft,
    errors: FieldErrors,
}

impl ContactsPage {
    pub fn new(repo: Arc<dyn CrudRepository<contact::Entity>>) -> Self {
        Self {
            repo,
            contacts: Vec::new(),
            query: ContactQuery::default(),
            show_form: false,
            editing_id: None,
            form: contact::Draft::default(),
            errors: FieldErrors::new(),
        }
    }

    /// Reload, ordered by name.
    pub async fn load(&mut self) -> Result<(), RepoError> {
        self.contacts = self
            .repo
            .find(FindOptions::all().order_by("name", Direction::Asc))
            .await?;
        Ok(())
    }

    pub fn contacts(&self) -> &[contact::Model] {
        &self.contacts
    }

    pub fn set_search(&mut self, search: &str) {
        self.query.search = search.to_string();
    }

    /// Loaded contacts matching the search box.
    pub fn visible(&self) -> Vec<contact::Model> {
        self.query.apply(&self.contacts)
    }

    pub fn show_form(&self) -> bool {
        self.show_form
    }

    pub fn editing_id(&self) -> Option<i32> {
        self.editing_id
    }

    pub fn form(&self) -> &contact::Draft {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut contact::Draft {
        &mut self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The "Add Contact" / "Cancel" header button: closes an open add form,
    /// otherwise opens an empty one (abandoning any edit).
    pub fn toggle_add_form(&mut self) {
        if self.show_form && self.editing_id.is_none() {
            self.reset_form();
        } else {
            self.reset_form();
            self.show_form = true;
        }
    }

    pub fn start_edit(&mut self, id: i32) -> bool {
        let Some(contact) = self.contacts.iter().find(|c| c.id == id) else {
            return false;
        };
        self.form = contact::Entity::to_draft(contact);
        self.errors.clear();
        self.editing_id = Some(id);
        self.show_form = true;
        true
    }

    pub fn reset_form(&mut self) {
        self.form = contact::Draft::default();
        self.errors.clear();
        self.editing_id = None;
        self.show_form = false;
    }

    /// Validate, then insert or save the edited contact, reset the form and
    /// reload. Returns false when validation blocked the submit.
    pub async fn submit(&mut self) -> Result<bool, RepoError> {
        self.errors = validation::validate_contact(&self.form);
        if !self.errors.is_empty() {
            return Ok(false);
        }

        match self.editing_id {
            Some(id) => {
                if self.contacts.iter().any(|c| c.id == id) {
                    self.repo.save(id, self.form.clone()).await?;
                }
            }
            None => {
                self.repo.insert(self.form.clone()).await?;
            }
        }
        self.reset_form();
        self.load().await?;
        Ok(true)
    }

    pub async fn delete_contact(
        &mut self,
        id: i32,
        confirm: impl FnOnce() -> bool,
    ) -> Result<bool, RepoError> {
        if !confirm() {
            return Ok(false);
        }
        self.repo.delete(id).await?;
        self.load().await?;
        Ok(true)
    }
}

pub struct ProductsPage {
    repo: Arc<dyn CrudRepository<product::Entity>>,
    products: Vec<product::Model>,
    categories: Vec<String>,
    pub query: ProductQuery,
}

impl ProductsPage {
    pub fn new(repo: Arc<dyn CrudRepository<product::Entity>>) -> Self {
        Self {
            repo,
            products: Vec::new(),
            categories: Vec::new(),
            query: ProductQuery::default(),
        }
    }

    /// Reload all products. Categories are recomputed here and only here,
    /// not when the filters change.
    pub async fn load(&mut self) -> Result<(), RepoError> {
        self.products = self.repo.find(FindOptions::all()).await?;
        self.categories = query::distinct_categories(&self.products);
        Ok(())
    }

    pub fn products(&self) -> &[product::Model] {
        &self.products
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Loaded products after search, category and stock filters, sorted.
    pub fn visible(&self) -> Vec<product::Model> {
        self.query.apply(&self.products)
    }
}
