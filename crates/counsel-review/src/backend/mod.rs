//! In-memory reference backend serving the REST shapes the review client expects.

pub mod repository;
pub mod router;
pub mod seed;


pub use repository::{
    AdminDataset, AdminRepository, ApplicationDecision, MemoryAdminRepository, RepositoryError,
};
pub use router::{admin_router, AccessPolicy, BackendError, BackendState, ListParams};
pub use seed::{demo_dataset, demo_repository};
