use reqwest::{header, Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{Result, ScheduleError};
use crate::schedule::Schedule;

/// Client for the dashboard's doctor directory and schedule store.
#[derive(Clone)]
pub struct ScheduleClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub department_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
}

impl ScheduleClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json, text/plain, */*"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn get(&self, path: &str) -> Result<Response> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self.authorized(self.client.get(&url)).send().await?;
        Ok(response)
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        let response = self.get("/doctors").await?;

        if !response.status().is_success() {
            return Err(ScheduleError::Api(format!(
                "Failed to get doctors: {}",
                response.status()
            )));
        }

        let mut doctors: Vec<Doctor> = response.json().await?;
        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(doctors)
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>> {
        let response = self.get("/departments").await?;

        if !response.status().is_success() {
            return Err(ScheduleError::Api(format!(
                "Failed to get departments: {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    pub async fn list_schedules(&self) -> Result<Vec<Schedule>> {
        let response = self.get("/schedules").await?;

        if !response.status().is_success() {
            return Err(ScheduleError::Api(format!(
                "Failed to get schedules: {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    pub async fn get_by_doctor(&self, doctor_id: &str) -> Result<Schedule> {
        let response = self.get(&format!("/schedules/doctor/{}", doctor_id)).await?;

        if !response.status().is_success() {
            return Err(ScheduleError::Api(format!(
                "Failed to get schedule for doctor {}: {}",
                doctor_id,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// Stores a new schedule. Editing also goes through here; the store is
    /// never asked to replace an existing schedule.
    pub async fn create_for_doctor(&self, schedule: &Schedule) -> Result<Schedule> {
        let url = self.url("/schedules");
        debug!(
            "POST {} ({} days for doctor {})",
            url,
            schedule.days.len(),
            schedule.doctor
        );

        let response = self
            .authorized(self.client.post(&url))
            .header(header::CONTENT_TYPE, "application/json;charset=utf-8")
            .json(schedule)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScheduleError::Api(format!(
                "Saving schedule failed ({}): {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}
