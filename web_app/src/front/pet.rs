use ntex::{util::Bytes, web};
use serde_json::json;

use crate::{
    api,
    front::{AppState, forms},
};

const PET_NOT_FOUND: &str = "Pet not found";

#[web::get("")]
async fn list_pets(app_state: web::types::State<AppState>) -> Result<impl web::Responder, web::Error> {
    let pets = api::pet::list_pets(&app_state.repo).await?;

    Ok(web::HttpResponse::Ok().json(&json!({"success": true, "pets": pets})))
}

#[web::get("/stats")]
async fn get_stats(app_state: web::types::State<AppState>) -> Result<impl web::Responder, web::Error> {
    let stats = api::stats::get_dashboard_stats(&app_state.repo).await?;

    Ok(web::HttpResponse::Ok().json(&json!({"success": true, "stats": stats})))
}

/// Lookup used at pet owner login
#[web::get("/microchip/{chip_number}")]
async fn get_pet_by_microchip(
    path: web::types::Path<(String,)>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let pet = api::pet::get_pet_by_microchip(&path.0, &app_state.repo).await?;

    Ok(web::HttpResponse::Ok().json(&json!({"success": true, "pet": pet})))
}

#[web::get("/{pet_id}")]
async fn get_pet(
    path: web::types::Path<(String,)>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let pet_id = forms::parse_id(&path.0, PET_NOT_FOUND)?;
    let pet = api::pet::get_pet(pet_id, &app_state.repo).await?;

    Ok(web::HttpResponse::Ok().json(&json!({"success": true, "pet": pet})))
}

#[web::post("")]
async fn create_pet(
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let form: forms::pet::PetRecordForm = forms::parse_body(&body)?;
    let pet_id = api::pet::create_pet(&form, &app_state.repo).await?;

    Ok(web::HttpResponse::Created().json(&json!({
        "success": true,
        "id": pet_id,
        "message": "Pet added successfully",
    })))
}

#[web::put("/{pet_id}")]
async fn update_pet(
    path: web::types::Path<(String,)>,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let pet_id = forms::parse_id(&path.0, PET_NOT_FOUND)?;
    let form: forms::pet::PetRecordForm = forms::parse_body(&body)?;
    api::pet::update_pet(pet_id, &form, &app_state.repo).await?;

    Ok(web::HttpResponse::Ok().json(&json!({
        "success": true,
        "message": "Pet updated successfully",
    })))
}

#[web::delete("/{pet_id}")]
async fn delete_pet(
    path: web::types::Path<(String,)>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let pet_id = forms::parse_id(&path.0, PET_NOT_FOUND)?;
    api::pet::delete_pet(pet_id, &app_state.repo).await?;

    Ok(web::HttpResponse::Ok().json(&json!({
        "success": true,
        "message": "Pet and associated data deleted successfully",
    })))
}
