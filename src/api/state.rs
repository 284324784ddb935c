use std::sync::Arc;

use crate::{
    auth::{AdminPolicy, AuthService},
    config::Settings,
    service::ServiceContext,
};

#[derive(Clone)]
pub struct AppState {
    pub service_context: Arc<ServiceContext>,
    pub auth_service: Arc<AuthService>,
    pub admin_policy: Arc<AdminPolicy>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        service_context: Arc<ServiceContext>,
        auth_service: Arc<AuthService>,
        admin_policy: AdminPolicy,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            service_context,
            auth_service,
            admin_policy: Arc::new(admin_policy),
            settings,
        }
    }
}
