use tokio::sync::oneshot;
use crate::domain::{Session, User, UserPatch};
use super::SessionError;

pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed messages for the session actor. Each variant carries its
/// parameters and a oneshot channel for the reply.
#[derive(Debug)]
pub enum SessionRequest {
    GetSession {
        respond_to: ServiceResponse<Option<Session>, SessionError>,
    },
    SetSession {
        session: Session,
        respond_to: ServiceResponse<(), SessionError>,
    },
    UpdateUser {
        patch: UserPatch,
        respond_to: ServiceResponse<User, SessionError>,
    },
    EnrollCourse {
        course_id: String,
        respond_to: ServiceResponse<User, SessionError>,
    },
    ClearSession {
        respond_to: ServiceResponse<(), SessionError>,
    },
}
