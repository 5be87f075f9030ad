use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::workflows::review::{
    AdminUser, Appointment, AppointmentStatus, Counselor, CounselorApplication, Couple,
    CoupleStatus, DashboardStats, RecordId, VerificationStatus,
};

/// Admin verdict on a pending counselor application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationDecision {
    Approve,
    Reject { reason: String },
}

/// Storage abstraction behind the reference backend routes.
pub trait AdminRepository: Send + Sync {
    fn applications(&self) -> Result<Vec<CounselorApplication>, RepositoryError>;
    fn counselors(&self) -> Result<Vec<Counselor>, RepositoryError>;
    fn couples(&self) -> Result<Vec<Couple>, RepositoryError>;
    fn users(&self) -> Result<Vec<AdminUser>, RepositoryError>;
    fn appointments(&self) -> Result<Vec<Appointment>, RepositoryError>;

    fn decide_application(
        &self,
        id: RecordId,
        decision: ApplicationDecision,
    ) -> Result<CounselorApplication, RepositoryError>;
    fn set_user_active(&self, id: RecordId, active: bool) -> Result<AdminUser, RepositoryError>;
    fn cancel_appointment(&self, id: RecordId) -> Result<Appointment, RepositoryError>;

    fn stats(&self) -> Result<DashboardStats, RepositoryError> {
        let now = Utc::now();
        Ok(DashboardStats {
            total_users: self.users()?.len() as u64,
            active_couples: self
                .couples()?
                .iter()
                .filter(|couple| couple.status == CoupleStatus::Active)
                .count() as u64,
            pending_applications: self
                .applications()?
                .iter()
                .filter(|application| application.status == VerificationStatus::Pending)
                .count() as u64,
            verified_counselors: self
                .counselors()?
                .iter()
                .filter(|counselor| counselor.status == VerificationStatus::Approved)
                .count() as u64,
            upcoming_appointments: self
                .appointments()?
                .iter()
                .filter(|appointment| {
                    appointment.status.is_cancellable() && appointment.scheduled_at > now
                })
                .count() as u64,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("{0}")]
    InvalidTransition(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default, Clone)]
pub struct AdminDataset {
    pub applications: Vec<CounselorApplication>,
    pub counselors: Vec<Counselor>,
    pub couples: Vec<Couple>,
    pub users: Vec<AdminUser>,
    pub appointments: Vec<Appointment>,
}

/// Mutex-guarded in-memory repository.
#[derive(Debug, Default, Clone)]
pub struct MemoryAdminRepository {
    data: Arc<Mutex<AdminDataset>>,
}

impl MemoryAdminRepository {
    pub fn new(dataset: AdminDataset) -> Self {
        Self {
            data: Arc::new(Mutex::new(dataset)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, AdminDataset>, RepositoryError> {
        self.data
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }

    pub fn snapshot(&self) -> Result<AdminDataset, RepositoryError> {
        Ok(self.lock()?.clone())
    }
}

impl AdminRepository for MemoryAdminRepository {
    fn applications(&self) -> Result<Vec<CounselorApplication>, RepositoryError> {
        Ok(self.lock()?.applications.clone())
    }

    fn counselors(&self) -> Result<Vec<Counselor>, RepositoryError> {
        Ok(self.lock()?.counselors.clone())
    }

    fn couples(&self) -> Result<Vec<Couple>, RepositoryError> {
        Ok(self.lock()?.couples.clone())
    }

    fn users(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        Ok(self.lock()?.users.clone())
    }

    fn appointments(&self) -> Result<Vec<Appointment>, RepositoryError> {
        Ok(self.lock()?.appointments.clone())
    }

    fn decide_application(
        &self,
        id: RecordId,
        decision: ApplicationDecision,
    ) -> Result<CounselorApplication, RepositoryError> {
        let mut guard = self.lock()?;
        let data = &mut *guard;
        let application = data
            .applications
            .iter_mut()
            .find(|application| application.id == id)
            .ok_or(RepositoryError::NotFound)?;

        if application.status != VerificationStatus::Pending {
            return Err(RepositoryError::InvalidTransition(format!(
                "application {id} is already {}",
                application.status.label()
            )));
        }

        match decision {
            ApplicationDecision::Approve => {
                application.status = VerificationStatus::Approved;
                let next_id = data
                    .counselors
                    .iter()
                    .map(|counselor| counselor.id.0)
                    .max()
                    .unwrap_or(0)
                    + 1;
                data.counselors.push(Counselor {
                    id: RecordId(next_id),
                    full_name: application.full_name.clone(),
                    email: application.email.clone(),
                    specialization: application.specialization.clone(),
                    status: VerificationStatus::Approved,
                    active_couples: 0,
                });
            }
            ApplicationDecision::Reject { reason } => {
                application.status = VerificationStatus::Rejected;
                application.rejection_reason = Some(reason);
            }
        }

        Ok(application.clone())
    }

    fn set_user_active(&self, id: RecordId, active: bool) -> Result<AdminUser, RepositoryError> {
        let mut guard = self.lock()?;
        let user = guard
            .users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or(RepositoryError::NotFound)?;
        user.is_active = active;
        Ok(user.clone())
    }

    fn cancel_appointment(&self, id: RecordId) -> Result<Appointment, RepositoryError> {
        let mut guard = self.lock()?;
        let appointment = guard
            .appointments
            .iter_mut()
            .find(|appointment| appointment.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if !appointment.status.is_cancellable() {
            return Err(RepositoryError::InvalidTransition(format!(
                "appointment {id} is already {}",
                appointment.status.label()
            )));
        }
        appointment.status = AppointmentStatus::Cancelled;
        Ok(appointment.clone())
    }
}
