use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};
use crate::domain::{Session, User, UserPatch};
use super::{SessionError, SessionRequest};

/// Port through which the rest of the crate reads and writes the session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self) -> Result<Option<Session>, SessionError>;
    async fn set(&self, session: Session) -> Result<(), SessionError>;
    /// Merges `patch` into the signed-in user. Concurrent writers are
    /// applied in arrival order.
    async fn update_user(&self, patch: UserPatch) -> Result<User, SessionError>;
    /// Appends `course_id` to the user's enrollments unless already present.
    async fn enroll(&self, course_id: String) -> Result<User, SessionError>;
    async fn clear(&self) -> Result<(), SessionError>;

    async fn current_user(&self) -> Result<User, SessionError> {
        self.get()
            .await?
            .map(|session| session.user)
            .ok_or(SessionError::NotAuthenticated)
    }

    async fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.get().await?.map(|session| session.token))
    }
}

macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error_type:ty) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error_type> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| <$error_type>::ActorCommunicationError("Actor closed".to_string()))?;

                response.await.map_err(|_| <$error_type>::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}

/// Handle to the [`SessionService`](super::SessionService) actor.
#[derive(Clone)]
pub struct SessionClient {
    sender: mpsc::Sender<SessionRequest>,
}

impl SessionClient {
    pub fn new(sender: mpsc::Sender<SessionRequest>) -> Self {
        Self { sender }
    }
}

client_method!(SessionClient => fn get_session() -> Option<Session> as SessionRequest::GetSession, Error = SessionError);
client_method!(SessionClient => fn set_session(session: Session) -> () as SessionRequest::SetSession, Error = SessionError);
client_method!(SessionClient => fn update_session_user(patch: UserPatch) -> User as SessionRequest::UpdateUser, Error = SessionError);
client_method!(SessionClient => fn enroll_course(course_id: String) -> User as SessionRequest::EnrollCourse, Error = SessionError);
client_method!(SessionClient => fn clear_session() -> () as SessionRequest::ClearSession, Error = SessionError);

#[async_trait]
impl SessionStore for SessionClient {
    async fn get(&self) -> Result<Option<Session>, SessionError> {
        self.get_session().await
    }

    async fn set(&self, session: Session) -> Result<(), SessionError> {
        self.set_session(session).await
    }

    async fn update_user(&self, patch: UserPatch) -> Result<User, SessionError> {
        self.update_session_user(patch).await
    }

    async fn enroll(&self, course_id: String) -> Result<User, SessionError> {
        self.enroll_course(course_id).await
    }

    async fn clear(&self) -> Result<(), SessionError> {
        self.clear_session().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use super::*;
    use crate::session::{MemorySessionStorage, SessionService};

    async fn spawn_session(storage: MemorySessionStorage) -> SessionClient {
        let (service, client) = SessionService::start(8, Arc::new(storage)).await;
        tokio::spawn(service.run());
        client
    }

    fn signed_in() -> Session {
        Session::new(User::new("u1", "Asha", "asha@example.com"), "tok_1")
    }

    #[tokio::test]
    async fn test_restores_stored_session() {
        let client = spawn_session(MemorySessionStorage::with_session(signed_in())).await;
        assert_eq!(client.token().await.unwrap().as_deref(), Some("tok_1"));
        assert_eq!(client.current_user().await.unwrap().user_id, "u1");
    }

    #[tokio::test]
    async fn test_updates_are_mirrored_wholesale() {
        let storage = MemorySessionStorage::default();
        let client = spawn_session(storage.clone()).await;

        client.set(signed_in()).await.unwrap();
        client
            .update_user(UserPatch { city: Some("Kochi".into()), ..UserPatch::default() })
            .await
            .unwrap();
        client.enroll("c1".into()).await.unwrap();
        let user = client.enroll("c1".into()).await.unwrap();
        assert_eq!(user.enrolled_courses, vec!["c1".to_string()]);

        let mirrored = storage.snapshot().await.unwrap();
        assert_eq!(mirrored.user, user);
        assert_eq!(mirrored.user.city.as_deref(), Some("Kochi"));
    }

    #[tokio::test]
    async fn test_clear_signs_out() {
        let storage = MemorySessionStorage::with_session(signed_in());
        let client = spawn_session(storage.clone()).await;

        client.clear().await.unwrap();
        assert_eq!(client.current_user().await, Err(SessionError::NotAuthenticated));
        assert_eq!(client.enroll("c1".into()).await, Err(SessionError::NotAuthenticated));
        assert_eq!(storage.snapshot().await, None);
    }

    #[tokio::test]
    async fn test_closed_actor_reports_communication_error() {
        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);
        let client = SessionClient::new(sender);
        assert!(matches!(client.get().await, Err(SessionError::ActorCommunicationError(_))));
    }
}
