use ntex::{util::Bytes, web};
use ntex_identity::Identity;
use serde_json::json;

use crate::{
    api,
    front::{AppState, errors, forms},
    models,
};

/// Checks the credentials and remembers the user in the identity cookie
#[web::post("/login")]
async fn login(
    body: Bytes,
    app_state: web::types::State<AppState>,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let form: forms::user::LoginForm = forms::parse_body(&body)?;
    let user = api::user::login(&form.username, &form.password, &app_state.repo).await?;

    identity.remember(serde_json::to_string(&user).map_err(|e| {
        errors::ApiError::StoreFailure(format!("session user couldnt be serialized: {e}"))
    })?);

    Ok(web::HttpResponse::Ok().json(&json!({"success": true, "user": user})))
}

/// The user remembered by the identity cookie, 401 without one
#[web::get("/session")]
async fn get_session(
    user: models::user_app::SessionUser,
) -> Result<impl web::Responder, web::Error> {
    Ok(web::HttpResponse::Ok().json(&json!({"success": true, "user": user})))
}

#[web::post("/logout")]
async fn logout(identity: Identity) -> Result<impl web::Responder, web::Error> {
    identity.forget();

    Ok(web::HttpResponse::Ok().json(&json!({"success": true, "message": "Logged out"})))
}
