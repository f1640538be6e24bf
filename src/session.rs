use tracing::{error, info, warn};

use crate::api::{Department, Doctor, ScheduleClient};
use crate::builder::{BuilderState, SchedulePreview};
use crate::error::Result;
use crate::reconstruct::reconstruct;
use crate::schedule::{compose, Schedule};

/// Message shown to the user after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub is_error: bool,
}

/// One open builder dialog. Owns the only mutable [`BuilderState`].
pub struct BuilderSession {
    client: ScheduleClient,
    defaults: BuilderState,
    state: BuilderState,

    doctors: Vec<Doctor>,
    departments: Vec<Department>,
    department: Option<String>,
    doctor: Option<String>,

    notification: Option<Notification>,
}

impl BuilderSession {
    pub fn new(client: ScheduleClient, defaults: BuilderState) -> Self {
        Self {
            client,
            state: defaults.clone(),
            defaults,
            doctors: Vec::new(),
            departments: Vec::new(),
            department: None,
            doctor: None,
            notification: None,
        }
    }

    /// Fetches doctors and departments. A failed fetch leaves that list empty.
    pub async fn load_directory(&mut self) {
        match self.client.list_doctors().await {
            Ok(doctors) => self.doctors = doctors,
            Err(e) => {
                error!("Failed to load doctors: {}", e);
                self.doctors.clear();
                self.notify_error(format!("Failed to load doctors: {}", e));
            }
        }

        match self.client.list_departments().await {
            Ok(departments) => self.departments = departments,
            Err(e) => {
                error!("Failed to load departments: {}", e);
                self.departments.clear();
                self.notify_error(format!("Failed to load departments: {}", e));
            }
        }
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// Doctors matching the selected department, or all of them if none is selected.
    pub fn doctors_in_department(&self) -> Vec<&Doctor> {
        self.doctors
            .iter()
            .filter(|d| {
                self.department
                    .as_ref()
                    .is_none_or(|dept| &d.department_id == dept)
            })
            .collect()
    }

    /// Changing department clears a doctor who does not belong to it.
    pub fn select_department(&mut self, department: Option<String>) {
        self.department = department;

        let still_listed = self.doctor.as_ref().is_some_and(|id| {
            self.doctors_in_department().iter().any(|d| &d.id == id)
        });
        if !still_listed {
            self.doctor = None;
        }
    }

    pub fn select_doctor(&mut self, doctor_id: Option<String>) {
        self.doctor = doctor_id;
    }

    pub fn selected_doctor(&self) -> Option<&str> {
        self.doctor.as_deref()
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut BuilderState {
        &mut self.state
    }

    pub fn preview(&self) -> SchedulePreview {
        self.state.derive_view()
    }

    /// Seeds the builder from the doctor's stored schedule. Any failure
    /// starts the edit from defaults and leaves an error notification.
    pub async fn open_edit(&mut self, doctor_id: &str) {
        self.doctor = Some(doctor_id.to_string());

        match self.client.get_by_doctor(doctor_id).await {
            Ok(schedule) => {
                info!(
                    "Loaded schedule for doctor {} ({} days)",
                    doctor_id,
                    schedule.days.len()
                );
                match reconstruct(&schedule.days) {
                    Ok(state) => self.state = state,
                    Err(e) => {
                        warn!("Starting edit for doctor {} from defaults: {}", doctor_id, e);
                        self.state = self.defaults.clone();
                        self.notify_error(format!("Nothing to edit: {}", e));
                    }
                }
            }
            Err(e) => {
                warn!("Failed to load schedule for doctor {}: {}", doctor_id, e);
                self.state = self.defaults.clone();
                self.notify_error(format!("Failed to load schedule: {}", e));
            }
        }
    }

    /// Composes and stores the schedule. On failure the builder keeps its
    /// current parameters so the user can retry.
    pub async fn save(&mut self) -> Result<Schedule> {
        let schedule = match compose(&self.state, self.doctor.as_deref()) {
            Ok(schedule) => schedule,
            Err(e) => {
                self.notify_error(e.to_string());
                return Err(e.into());
            }
        };

        match self.client.create_for_doctor(&schedule).await {
            Ok(saved) => {
                info!(
                    "Saved schedule for doctor {} ({} days, {} slots)",
                    saved.doctor,
                    saved.days.len(),
                    saved.slot_count()
                );
                self.notification = Some(Notification {
                    message: format!("Schedule saved for {} days", saved.days.len()),
                    is_error: false,
                });
                self.state = self.defaults.clone();
                Ok(saved)
            }
            Err(e) => {
                error!("Failed to save schedule: {}", e);
                self.notify_error(format!("Failed to save schedule: {}", e));
                Err(e)
            }
        }
    }

    /// Discards the current parameters and selection.
    pub fn reset(&mut self) {
        self.state = self.defaults.clone();
        self.doctor = None;
        self.notification = None;
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn clear_notification(&mut self) {
        self.notification = None;
    }

    fn notify_error(&mut self, message: String) {
        self.notification = Some(Notification {
            message,
            is_error: true,
        });
    }
}
