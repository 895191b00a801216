use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{err, ok, Ready};

use crate::errors::AppError;
use crate::session::SessionStore;

/// Extractor that requires a logged-in session and provides the user's email.
pub struct CurrentUser {
    pub email: String,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = match req.app_data::<web::Data<SessionStore>>() {
            Some(session) => session,
            None => {
                return err(AppError::InternalError(
                    "Session store not configured".to_string(),
                ))
            }
        };

        match session.current_user() {
            Some(email) => ok(CurrentUser { email }),
            None => err(AppError::Unauthorized("Please log in first".to_string())),
        }
    }
}
