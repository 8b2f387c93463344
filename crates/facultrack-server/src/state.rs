//! Shared application state.

use facultrack_auth::AuthConfig;
use facultrack_core::repository::InspectionRepository;
use facultrack_review::InspectionService;

pub struct AppState<R: InspectionRepository> {
    pub service: InspectionService<R>,
    pub auth: AuthConfig,
}
