use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};
use url::Url;
use crate::actor_framework::ResourceActor;
use crate::api::ApiClient;
use crate::clients::{CourseClient, PaymentClient};
use crate::course_actor::entity::catalog_key;
use crate::domain::{Course, PaymentAttempt, PaymentAttemptCreate, User};
use crate::enrollment::{CheckoutBranding, EnrollmentFlow, FlowDeps};
use crate::gateway::{ChannelGateway, PendingCheckout};
use crate::session::{FileSessionStorage, SessionClient, SessionService, SessionStorage, SessionStore};
use super::{AppConfig, SystemError};

/// The application system: starts the actors, wires the API client and the
/// checkout gateway, and hands out enrollment wizards.
pub struct EnrollmentSystem {
    pub session: SessionClient,
    pub api: ApiClient,
    pub catalog: CourseClient,
    pub ledger: PaymentClient,
    gateway: ChannelGateway,
    branding: CheckoutBranding,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl EnrollmentSystem {
    /// Starts the system from configuration. The returned receiver yields
    /// every checkout the wizards open; whoever holds it is the host.
    pub async fn start(config: &AppConfig) -> Result<(Self, mpsc::Receiver<PendingCheckout>), SystemError> {
        config.validate()?;
        let storage = FileSessionStorage::new(&config.session_file);
        Self::with_storage(config.api_url.clone(), config.http_timeout(), config.branding(), Arc::new(storage)).await
    }

    pub async fn with_storage(
        api_url: Url,
        http_timeout: Duration,
        branding: CheckoutBranding,
        storage: Arc<dyn SessionStorage>,
    ) -> Result<(Self, mpsc::Receiver<PendingCheckout>), SystemError> {
        info!(%api_url, "Starting enrollment system");

        // 1. Session service
        let (session_service, session) = SessionService::start(32, storage).await;
        let session_handle = tokio::spawn(session_service.run());

        // 2. Course catalog, keyed by course id
        let (course_actor, course_inner) = ResourceActor::<Course>::new(32, catalog_key);
        let catalog = CourseClient::new(course_inner);
        let catalog_handle = tokio::spawn(course_actor.run());

        // 3. Payment ledger, keyed by receipt
        let (payment_actor, payment_inner) =
            ResourceActor::<PaymentAttempt>::new(32, |params: &PaymentAttemptCreate| params.receipt.clone());
        let ledger = PaymentClient::new(payment_inner);
        let ledger_handle = tokio::spawn(payment_actor.run());

        // 4. Outbound edges
        let api = ApiClient::new(api_url, http_timeout, Arc::new(session.clone()))?;
        let (gateway, checkouts) = ChannelGateway::new(4);

        let system = Self {
            session,
            api,
            catalog,
            ledger,
            gateway,
            branding,
            handles: vec![session_handle, catalog_handle, ledger_handle],
        };
        Ok((system, checkouts))
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, SystemError> {
        let session = self.api.login(email, password).await?;
        let user = session.user.clone();
        self.session.set(session).await?;
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), SystemError> {
        self.session.clear().await?;
        Ok(())
    }

    /// Replaces the local catalog with the backend's course list.
    pub async fn refresh_catalog(&self) -> Result<usize, SystemError> {
        let courses = self.api.list_courses().await?;
        Ok(self.catalog.sync_catalog(courses).await?)
    }

    /// Returns a course from the catalog, fetching it when not cached.
    #[instrument(skip(self))]
    pub async fn load_course(&self, course_id: &str) -> Result<Course, SystemError> {
        if let Some(course) = self.catalog.get_course(course_id.to_string()).await? {
            return Ok(course);
        }
        let course = self.api.get_course(course_id).await?;
        self.catalog.sync_catalog(vec![course.clone()]).await?;
        Ok(course)
    }

    pub async fn open_enrollment(&self, course: Course) -> Result<EnrollmentFlow, SystemError> {
        let deps = FlowDeps {
            session: Arc::new(self.session.clone()),
            payments: Arc::new(self.api.clone()),
            gateway: Arc::new(self.gateway.clone()),
            ledger: self.ledger.clone(),
            branding: self.branding.clone(),
        };
        Ok(EnrollmentFlow::open(deps, course).await?)
    }

    /// Stops the actors. Wizards opened from this system must be closed
    /// first, since they hold clients of the same actors.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        let Self { session, api, catalog, ledger, gateway, handles, .. } = self;
        drop((session, api, catalog, ledger, gateway));

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::ActorTask(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::serve_once;
    use crate::enrollment::EnrollmentError;
    use crate::session::MemorySessionStorage;

    async fn system(url: Url, storage: MemorySessionStorage) -> EnrollmentSystem {
        let (system, _checkouts) = EnrollmentSystem::with_storage(
            url,
            Duration::from_secs(5),
            CheckoutBranding::default(),
            Arc::new(storage),
        )
        .await
        .unwrap();
        system
    }

    #[tokio::test]
    async fn test_login_stores_session_and_shutdown_joins_actors() {
        let (url, _request) = serve_once(200, r#"{"token":"jwt_1","user":{"user_id":"u1","email":"a@b.c"}}"#).await;
        let storage = MemorySessionStorage::default();
        let system = system(url, storage.clone()).await;

        let user = system.login("a@b.c", "pw").await.unwrap();
        assert_eq!(user.user_id, "u1");
        assert_eq!(storage.snapshot().await.unwrap().token, "jwt_1");

        let flow = system.open_enrollment(Course::new("c1", "Torts", 900.0)).await.unwrap();
        assert_eq!(flow.step().index(), 0);
        flow.close();

        system.logout().await.unwrap();
        assert_eq!(storage.snapshot().await, None);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_open_requires_sign_in() {
        let url = Url::parse("http://127.0.0.1:9/api").unwrap();
        let system = system(url, MemorySessionStorage::default()).await;
        let result = system.open_enrollment(Course::new("c1", "Torts", 900.0)).await;
        assert!(matches!(result, Err(SystemError::Enrollment(EnrollmentError::NotAuthenticated))));
    }

    #[tokio::test]
    async fn test_load_course_prefers_catalog() {
        let url = Url::parse("http://127.0.0.1:9/api").unwrap();
        let system = system(url, MemorySessionStorage::default()).await;
        system.catalog.sync_catalog(vec![Course::new("c7", "Evidence", 700.0)]).await.unwrap();

        let course = system.load_course("c7").await.unwrap();
        assert_eq!(course.title, "Evidence");
    }
}
