//! Handlers not linked to a specific resource

use ntex::web;
use serde_json::json;

use crate::front::{AppState, errors};

/// Liveness plus a round trip to the store
#[web::get("/health")]
async fn health(app_state: web::types::State<AppState>) -> Result<impl web::Responder, web::Error> {
    app_state
        .repo
        .ping()
        .await
        .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&json!({
        "success": true,
        "message": "Server is running",
        "database": "connected",
    })))
}

/// Return a [NotFound](errors::ApiError::NotFound) error for urls not defined
pub async fn serve_not_found() -> Result<web::HttpResponse, web::Error> {
    Err(errors::ApiError::NotFound("Route not found".to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        front::routes,
        repo::{MockAppRepo, sqlite::in_memory_repo},
        services::ReplyChain,
    };
    use ntex::{http, web::test};

    #[ntex::test]
    async fn test_health_and_not_found() {
        let app = test::init_service(
            web::App::new()
                .state(AppState {
                    repo: Box::new(in_memory_repo().await),
                    reply_chain: ReplyChain::default(),
                })
                .configure(routes::api)
                .default_service(web::route().to(serve_not_found)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::read_response_json(&app, req).await;
        assert_eq!(body["database"], "connected");

        let req = test::TestRequest::get().uri("/api/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
    }

    #[ntex::test]
    async fn test_health_reports_store_failure() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_ping()
            .times(1)
            .returning(|| Err(anyhow::anyhow!("unable to open database file")));

        let app = test::init_service(
            web::App::new()
                .state(AppState {
                    repo: Box::new(mock_repo),
                    reply_chain: ReplyChain::default(),
                })
                .configure(routes::api),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
