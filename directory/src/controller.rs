use std::fmt;

use entity::Employee;
use platform_api::{ApiError, EmployeeClient};
use tracing::{info, warn};

use crate::draft::EmployeeDraft;

/// Outcome of the last action that did not go as planned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    NotFound(String),
    Failed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NotFound(matricule) => write!(f, "no employee with matricule {matricule}"),
            Notice::Failed(message) => f.write_str(message),
        }
    }
}

/// Everything the directory screen shows.
#[derive(Clone, Debug, Default)]
pub struct DirectoryView {
    pub employees: Vec<Employee>,
    pub searched: Option<Employee>,
    pub search_matricule: String,
    pub draft: EmployeeDraft,
    pub notice: Option<Notice>,
}

impl DirectoryView {
    pub fn contains(&self, matricule: &str) -> bool {
        self.employees.iter().any(|e| e.matricule == matricule)
    }
}

/// Sequences client calls for user actions and folds the results into
/// the view. A failed request leaves the list and detail untouched and
/// records a [`Notice`] instead.
pub struct DirectoryController {
    client: EmployeeClient,
    view: DirectoryView,
}

impl DirectoryController {
    pub fn new(client: EmployeeClient) -> Self {
        Self {
            client,
            view: DirectoryView::default(),
        }
    }

    pub fn view(&self) -> &DirectoryView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut DirectoryView {
        &mut self.view
    }

    pub fn client(&self) -> &EmployeeClient {
        &self.client
    }

    pub async fn load_employees(&mut self) {
        self.view.notice = None;
        self.reload().await;
    }

    /// Submits the draft; on success the draft is cleared and the list reloaded.
    /// The detail pane is left as it was.
    pub async fn add_employee(&mut self) {
        self.view.notice = None;
        let employee = match self.view.draft.to_employee() {
            Ok(employee) => employee,
            Err(err) => {
                self.view.notice = Some(Notice::Failed(err.to_string()));
                return;
            }
        };
        if self.submit(employee).await.is_some() {
            self.view.draft.reset();
        }
    }

    /// Creates a fully specified record; on success it becomes the detail.
    pub async fn create_employee(&mut self, employee: Employee) {
        self.view.notice = None;
        if let Some(created) = self.submit(employee).await {
            self.view.searched = Some(created);
        }
    }

    /// Looks up `search_matricule`. A blank key sends nothing.
    pub async fn search_employee(&mut self) {
        let matricule = self.view.search_matricule.trim().to_string();
        if matricule.is_empty() {
            return;
        }
        self.view.notice = None;
        match self.client.get_employee(&matricule).await {
            Ok(employee) => self.view.searched = Some(employee),
            Err(err) if err.is_not_found() => {
                self.view.searched = None;
                self.view.notice = Some(Notice::NotFound(matricule));
            }
            Err(err) => self.record_failure("search", err),
        }
    }

    pub async fn search_for(&mut self, matricule: &str) {
        self.view.search_matricule = matricule.to_string();
        self.search_employee().await;
    }

    /// A blank matricule sends nothing.
    pub async fn update_employee(&mut self, matricule: &str, employee: &Employee) {
        let matricule = matricule.trim();
        if matricule.is_empty() {
            return;
        }
        self.view.notice = None;
        match self.client.update_employee(matricule, employee).await {
            Ok(updated) => {
                info!(matricule, "employee updated");
                let shown = self
                    .view
                    .searched
                    .as_ref()
                    .is_some_and(|e| e.matricule == matricule);
                if shown {
                    self.view.searched = Some(updated);
                }
                self.reload().await;
            }
            Err(err) => self.record_failure("update", err),
        }
    }

    /// A blank matricule sends nothing.
    pub async fn delete_employee(&mut self, matricule: &str) {
        let matricule = matricule.trim();
        if matricule.is_empty() {
            return;
        }
        self.view.notice = None;
        match self.client.delete_employee(matricule).await {
            Ok(()) => {
                info!(matricule, "employee deleted");
                if self
                    .view
                    .searched
                    .as_ref()
                    .is_some_and(|e| e.matricule == matricule)
                {
                    self.view.searched = None;
                }
                self.reload().await;
            }
            Err(err) => self.record_failure("delete", err),
        }
    }

    async fn submit(&mut self, employee: Employee) -> Option<Employee> {
        match self.client.create_employee(&employee).await {
            Ok(created) => {
                info!(matricule = %created.matricule, "employee created");
                self.reload().await;
                Some(created)
            }
            Err(err) => {
                self.record_failure("create", err);
                None
            }
        }
    }

    async fn reload(&mut self) {
        match self.client.list_employees().await {
            Ok(employees) => self.view.employees = employees,
            Err(err) => self.record_failure("load employees", err),
        }
    }

    fn record_failure(&mut self, action: &'static str, err: ApiError) {
        warn!(action, error = %err, "request failed");
        self.view.notice = Some(Notice::Failed(format!("{action} failed: {err}")));
    }
}
