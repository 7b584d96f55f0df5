use ntex::{
    http::Payload,
    web::{Error, FromRequest, HttpRequest},
};
use ntex_identity::RequestIdentity;

use crate::front::errors;
use crate::models;

fn deserialize_session_user(str: &str) -> serde_json::Result<models::user_app::SessionUser> {
    serde_json::from_str::<models::user_app::SessionUser>(str)
}

/// Extracts the [models::user_app::SessionUser] from the identity cookie value
fn get_session_user(
    auth_cookie: Option<String>,
) -> Result<models::user_app::SessionUser, errors::ApiError> {
    deserialize_session_user(&auth_cookie.unwrap_or_default())
        .map_err(|_| errors::ApiError::Unauthenticated)
}

impl<Err> FromRequest<Err> for models::user_app::SessionUser {
    type Error = Error;

    fn from_request(
        req: &HttpRequest,
        _: &mut Payload,
    ) -> impl std::future::Future<Output = Result<Self, Self::Error>> {
        let identity_cookie = req.get_identity();
        futures::future::ready(get_session_user(identity_cookie).map_err(Error::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_session_user() {
        let cookie = r#"{"id":1,"username":"doctor1","user_type":"doctor"}"#;

        assert_eq!(
            get_session_user(Some(cookie.into())).unwrap().user_type,
            models::user_app::UserType::Doctor
        );
        assert_eq!(
            get_session_user(Some("not json".into())),
            Err(errors::ApiError::Unauthenticated)
        );
        assert_eq!(get_session_user(None), Err(errors::ApiError::Unauthenticated));
    }
}
