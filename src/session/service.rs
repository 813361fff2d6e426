use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};
use crate::domain::{Session, User, UserPatch};
use super::{SessionClient, SessionError, SessionRequest, SessionStorage, ServiceResponse};

/// Actor owning the current session.
///
/// Memory is authoritative. The storage mirror is rewritten after every
/// change; a failed write is logged and does not fail the request.
pub struct SessionService {
    receiver: mpsc::Receiver<SessionRequest>,
    session: Option<Session>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionService {
    /// Builds the actor, restoring any session found in `storage`.
    pub async fn start(buffer_size: usize, storage: Arc<dyn SessionStorage>) -> (Self, SessionClient) {
        let session = match storage.load().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable stored session");
                None
            }
        };
        if let Some(session) = &session {
            info!(user_id = %session.user.user_id, "Restored stored session");
        }
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self { receiver, session, storage };
        (service, SessionClient::new(sender))
    }

    #[instrument(name = "session_service", skip(self))]
    pub async fn run(mut self) {
        info!("SessionService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                SessionRequest::GetSession { respond_to } => {
                    let _ = respond_to.send(Ok(self.session.clone()));
                }
                SessionRequest::SetSession { session, respond_to } => {
                    self.handle_set_session(session, respond_to).await;
                }
                SessionRequest::UpdateUser { patch, respond_to } => {
                    self.handle_update_user(patch, respond_to).await;
                }
                SessionRequest::EnrollCourse { course_id, respond_to } => {
                    self.handle_enroll_course(course_id, respond_to).await;
                }
                SessionRequest::ClearSession { respond_to } => {
                    self.handle_clear_session(respond_to).await;
                }
            }
        }
        info!("SessionService stopped");
    }

    #[instrument(fields(user_id = %session.user.user_id), skip(self, session, respond_to))]
    async fn handle_set_session(&mut self, session: Session, respond_to: ServiceResponse<(), SessionError>) {
        info!("Signing in");
        self.session = Some(session);
        self.mirror().await;
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_update_user(&mut self, patch: UserPatch, respond_to: ServiceResponse<User, SessionError>) {
        let result = self.modify_user(|user| user.apply(patch)).await;
        let _ = respond_to.send(result);
    }

    #[instrument(fields(course_id = %course_id), skip(self, course_id, respond_to))]
    async fn handle_enroll_course(&mut self, course_id: String, respond_to: ServiceResponse<User, SessionError>) {
        let result = self
            .modify_user(|user| {
                if !user.enroll(&course_id) {
                    debug!("Course already enrolled");
                }
            })
            .await;
        if result.is_ok() {
            info!("Enrollment recorded");
        }
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_clear_session(&mut self, respond_to: ServiceResponse<(), SessionError>) {
        info!("Signing out");
        self.session = None;
        if let Err(e) = self.storage.clear().await {
            error!(error = %e, "Failed to clear stored session");
        }
        let _ = respond_to.send(Ok(()));
    }

    async fn modify_user(&mut self, change: impl FnOnce(&mut User)) -> Result<User, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NotAuthenticated)?;
        change(&mut session.user);
        let user = session.user.clone();
        self.mirror().await;
        Ok(user)
    }

    async fn mirror(&self) {
        if let Some(session) = &self.session {
            if let Err(e) = self.storage.save(session).await {
                error!(error = %e, "Failed to mirror session to storage");
            }
        }
    }
}
