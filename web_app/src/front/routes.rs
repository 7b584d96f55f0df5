//! Route configuration.
//!
//! Scopes are matched in registration order, so the `/api/pets` and
//! `/api/chat` scopes must be configured before the bare `/api` one.

use super::{auth, chat, pet, server};
use ntex::web;

/// Configures pet record routes.
///
/// # Routes
/// - `GET /api/pets` - All pets with owner/vet names
/// - `GET /api/pets/stats` - Dashboard statistics
/// - `GET /api/pets/microchip/{chip_number}` - Pet by microchip number
/// - `GET /api/pets/{pet_id}` - Pet by id
/// - `POST /api/pets` - Create pet
/// - `PUT /api/pets/{pet_id}` - Update pet
/// - `DELETE /api/pets/{pet_id}` - Delete pet and orphaned owner/vet
pub fn pets(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/pets").service((
        // static segments before `{pet_id}`
        pet::get_stats,
        pet::get_pet_by_microchip,
        pet::list_pets,
        pet::get_pet,
        pet::create_pet,
        pet::update_pet,
        pet::delete_pet,
    )));
}

/// Configures AI vet chat and doctor handoff routes.
///
/// # Routes
/// - `GET /api/chat/history/{microchip_number}`
/// - `POST /api/chat/message`
/// - `POST /api/chat/send-to-doctor`
/// - `GET /api/chat/doctor/pending`
/// - `PUT /api/chat/doctor/message/{message_id}/read`
pub fn chat(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/chat").service((
        chat::get_chat_history,
        chat::send_message,
        chat::send_to_doctor,
        chat::list_pending_doctor_messages,
        chat::mark_doctor_message_read,
    )));
}

/// Configures health and session routes.
///
/// # Routes
/// - `GET /api/health`
/// - `POST /api/login`
/// - `GET /api/session`
/// - `POST /api/logout`
pub fn api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").service((
        server::health,
        auth::login,
        auth::get_session,
        auth::logout,
    )));
}
