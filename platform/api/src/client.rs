use chrono::NaiveDate;
use entity::{
    DepartmentStatistics, Employee, EmployeeStatistics, EmployeeType, SearchCriteria, WorkDay,
};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{ApiError, ApiResult};

/// Path the employee service is mounted under.
pub const BASE_PATH: &str = "/api/employees";

/// Where the employee service lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
}

impl ClientConfig {
    /// Accepts the full collection URL, e.g. `http://localhost:8082/api/employees`.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let invalid = |reason: String| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(base_url.trim()).map_err(|err| invalid(err.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("expected an http(s) url".into()));
        }
        Ok(Self { base_url: parsed })
    }

    pub fn from_host_port(host: &str, port: u16) -> ApiResult<Self> {
        Self::new(&format!("http://{host}:{port}{BASE_PATH}"))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[derive(Clone, Debug)]
pub struct EmployeeClient {
    http: reqwest::Client,
    base: Url,
}

impl EmployeeClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("staff-directory/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(config, http))
    }

    pub fn with_http(config: ClientConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            base: config.base_url,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // CRUD

    pub async fn list_employees(&self) -> ApiResult<Vec<Employee>> {
        self.get(self.endpoint(&[])).await
    }

    pub async fn get_employee(&self, matricule: &str) -> ApiResult<Employee> {
        self.get(self.endpoint(&[matricule])).await
    }

    pub async fn create_employee(&self, employee: &Employee) -> ApiResult<Employee> {
        self.send_json(Method::POST, self.endpoint(&[]), employee)
            .await
    }

    pub async fn update_employee(
        &self,
        matricule: &str,
        employee: &Employee,
    ) -> ApiResult<Employee> {
        self.send_json(Method::PUT, self.endpoint(&[matricule]), employee)
            .await
    }

    pub async fn delete_employee(&self, matricule: &str) -> ApiResult<()> {
        let url = self.endpoint(&[matricule]);
        self.execute(Method::DELETE, url, |req| req).await?;
        Ok(())
    }

    pub async fn activate_employee(&self, matricule: &str) -> ApiResult<Employee> {
        let url = self.endpoint(&[matricule, "activate"]);
        let response = self.execute(Method::PATCH, url, |req| req).await?;
        decode(response).await
    }

    // Unique-field lookups

    pub async fn find_by_email(&self, email: &str) -> ApiResult<Employee> {
        self.get(self.endpoint(&["email", email])).await
    }

    pub async fn find_by_cin(&self, cin: &str) -> ApiResult<Employee> {
        self.get(self.endpoint(&["cin", cin])).await
    }

    pub async fn find_by_licence(&self, licence: &str) -> ApiResult<Employee> {
        self.get(self.endpoint(&["licence", licence])).await
    }

    /// Phone numbers are not unique server-side, hence the list.
    pub async fn find_by_telephone(&self, telephone: &str) -> ApiResult<Vec<Employee>> {
        self.get(self.endpoint(&["telephone", telephone])).await
    }

    // Filters

    pub async fn employees_by_type(&self, kind: EmployeeType) -> ApiResult<Vec<Employee>> {
        self.get(self.endpoint(&["type", kind.as_str()])).await
    }

    pub async fn administration_employees(&self) -> ApiResult<Vec<Employee>> {
        self.get(self.endpoint(&["administration"])).await
    }

    pub async fn medical_staff(&self) -> ApiResult<Vec<Employee>> {
        self.get(self.endpoint(&["medical-staff"])).await
    }

    pub async fn active_employees(&self) -> ApiResult<Vec<Employee>> {
        self.get(self.endpoint(&["active"])).await
    }

    pub async fn inactive_employees(&self) -> ApiResult<Vec<Employee>> {
        self.get(self.endpoint(&["inactive"])).await
    }

    pub async fn employees_by_department(&self, department: &str) -> ApiResult<Vec<Employee>> {
        self.get(self.endpoint(&["department", department])).await
    }

    pub async fn employees_by_department_and_type(
        &self,
        department: &str,
        kind: EmployeeType,
    ) -> ApiResult<Vec<Employee>> {
        let url = self.endpoint(&["department", department, "type", kind.as_str()]);
        self.get(url).await
    }

    pub async fn employees_by_speciality(&self, speciality: &str) -> ApiResult<Vec<Employee>> {
        self.get(self.endpoint(&["speciality", speciality])).await
    }

    pub async fn employees_by_supervisor(&self, supervisor: &str) -> ApiResult<Vec<Employee>> {
        self.get(self.endpoint(&["supervisor", supervisor])).await
    }

    pub async fn hired_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<Employee>> {
        let query = [
            ("startDate", start.format("%Y-%m-%d").to_string()),
            ("endDate", end.format("%Y-%m-%d").to_string()),
        ];
        self.get(self.endpoint_with_query(&["hired-between"], &query))
            .await
    }

    pub async fn employees_by_work_days(&self, days: &[WorkDay]) -> ApiResult<Vec<Employee>> {
        let query: Vec<_> = days
            .iter()
            .map(|day| ("workDays", day.as_str().to_string()))
            .collect();
        self.get(self.endpoint_with_query(&["work-days"], &query))
            .await
    }

    pub async fn employees_by_shift(
        &self,
        shift_start: &str,
        shift_end: &str,
    ) -> ApiResult<Vec<Employee>> {
        let query = [
            ("shiftStart", shift_start.to_string()),
            ("shiftEnd", shift_end.to_string()),
        ];
        self.get(self.endpoint_with_query(&["shift"], &query)).await
    }

    // Search

    /// Either side may be omitted; only the given names are sent.
    pub async fn search_by_name(
        &self,
        nom: Option<&str>,
        prenom: Option<&str>,
    ) -> ApiResult<Vec<Employee>> {
        let query: Vec<_> = [("nom", nom), ("prenom", prenom)]
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v.to_string())))
            .collect();
        self.get(self.endpoint_with_query(&["search", "name"], &query))
            .await
    }

    pub async fn search_by_full_name(&self, full_name: &str) -> ApiResult<Vec<Employee>> {
        self.get(self.endpoint(&["search", "fullname", full_name]))
            .await
    }

    pub async fn search_employees(&self, criteria: &SearchCriteria) -> ApiResult<Vec<Employee>> {
        let url = self.endpoint_with_query(&["search"], &criteria.query_pairs());
        self.get(url).await
    }

    // Composite queries

    pub async fn medical_staff_by_speciality_and_department(
        &self,
        speciality: &str,
        department: &str,
    ) -> ApiResult<Vec<Employee>> {
        let url = self.endpoint(&[
            "medical-staff",
            "speciality",
            speciality,
            "department",
            department,
        ]);
        self.get(url).await
    }

    pub async fn available_doctors(&self, day: WorkDay) -> ApiResult<Vec<Employee>> {
        self.get(self.endpoint(&["doctors", "available", day.as_str()]))
            .await
    }

    pub async fn medical_staff_with_licence(&self) -> ApiResult<Vec<Employee>> {
        self.get(self.endpoint(&["medical-staff", "with-licence"]))
            .await
    }

    pub async fn employees_without_supervisor(&self) -> ApiResult<Vec<Employee>> {
        self.get(self.endpoint(&["no-supervisor"])).await
    }

    // Aggregates

    pub async fn count_by_type(&self, kind: EmployeeType) -> ApiResult<u64> {
        self.get(self.endpoint(&["count", "type", kind.as_str()]))
            .await
    }

    pub async fn count_by_department(&self, department: &str) -> ApiResult<u64> {
        self.get(self.endpoint(&["count", "department", department]))
            .await
    }

    pub async fn department_statistics(&self) -> ApiResult<DepartmentStatistics> {
        self.get(self.endpoint(&["statistics", "department"]))
            .await
    }

    pub async fn statistics(&self) -> ApiResult<EmployeeStatistics> {
        self.get(self.endpoint(&["statistics"])).await
    }

    // Existence checks

    pub async fn email_exists(&self, email: &str) -> ApiResult<bool> {
        self.get(self.endpoint(&["exists", "email", email])).await
    }

    pub async fn cin_exists(&self, cin: &str) -> ApiResult<bool> {
        self.get(self.endpoint(&["exists", "cin", cin])).await
    }

    pub async fn licence_exists(&self, licence: &str) -> ApiResult<bool> {
        self.get(self.endpoint(&["exists", "licence", licence]))
            .await
    }

    /// Plain-text liveness probe.
    pub async fn health(&self) -> ApiResult<String> {
        let response = self
            .execute(Method::GET, self.endpoint(&["health"]), |req| req)
            .await?;
        Ok(response.text().await?)
    }

    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // ClientConfig rejects cannot-be-a-base urls, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn endpoint_with_query<V: AsRef<str>>(
        &self,
        segments: &[&str],
        query: &[(&str, V)],
    ) -> Url {
        let mut url = self.endpoint(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value.as_ref());
            }
        }
        url
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let response = self.execute(Method::GET, url, |req| req).await?;
        decode(response).await
    }

    async fn send_json<B, T>(&self, method: Method, url: Url, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(method, url, |req| req.json(body)).await?;
        decode(response).await
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> ApiResult<Response> {
        debug!(%method, %url, "dispatching request");
        let request = build(self.http.request(method.clone(), url.clone()));
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(%method, %url, %status, "request rejected");
        Err(ApiError::Status { status, body })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> EmployeeClient {
        EmployeeClient::new(ClientConfig::new(base).unwrap()).unwrap()
    }

    #[test]
    fn host_and_port_build_the_collection_url() {
        let config = ClientConfig::from_host_port("localhost", 8082).unwrap();
        assert_eq!(
            config.base_url().as_str(),
            "http://localhost:8082/api/employees"
        );
    }

    #[test]
    fn rejects_non_http_base() {
        let err = ClientConfig::new("mailto:hr@example.test").unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
        assert!(ClientConfig::new("not a url").is_err());
    }

    #[test]
    fn segments_are_appended_once_and_encoded() {
        let api = client("http://localhost:8082/api/employees/");
        assert_eq!(
            api.endpoint(&[]).as_str(),
            "http://localhost:8082/api/employees"
        );
        assert_eq!(
            api.endpoint(&["email", "a/b c@x.test"]).as_str(),
            "http://localhost:8082/api/employees/email/a%2Fb%20c@x.test"
        );
        assert_eq!(
            api.endpoint(&["department", "Cardiology", "type", "MEDICAL_STAFF"])
                .as_str(),
            "http://localhost:8082/api/employees/department/Cardiology/type/MEDICAL_STAFF"
        );
    }

    #[test]
    fn repeated_query_keys_are_preserved() {
        let api = client("http://localhost:8082/api/employees");
        let query = [
            ("workDays", "MONDAY".to_string()),
            ("workDays", "FRIDAY".to_string()),
        ];
        assert_eq!(
            api.endpoint_with_query(&["work-days"], &query).as_str(),
            "http://localhost:8082/api/employees/work-days?workDays=MONDAY&workDays=FRIDAY"
        );
    }

    #[test]
    fn empty_query_leaves_no_question_mark() {
        let api = client("http://localhost:8082/api/employees");
        let none: [(&str, String); 0] = [];
        assert_eq!(
            api.endpoint_with_query(&["search"], &none).as_str(),
            "http://localhost:8082/api/employees/search"
        );
    }

    #[tokio::test]
    async fn unreachable_host_surfaces_transport_error() {
        let api = client("http://127.0.0.1:9/api/employees");
        let err = api.health().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.status(), None);
    }
}
