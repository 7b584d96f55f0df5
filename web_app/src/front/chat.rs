use ntex::{util::Bytes, web};
use serde_json::json;

use crate::{
    api,
    front::{AppState, forms},
};

#[web::get("/history/{microchip_number}")]
async fn get_chat_history(
    path: web::types::Path<(String,)>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let history = api::chat::get_history(&path.0, &app_state.repo).await?;

    Ok(web::HttpResponse::Ok().json(&json!({
        "success": true,
        "state": history.state,
        "greeting": history.greeting,
        "messages": history.messages,
    })))
}

fn message_json(message: &crate::models::chat::ChatMessage) -> serde_json::Value {
    json!({
        "id": message.id,
        "message": message.message,
        "sender": message.sender,
        "created_at": message.created_at,
    })
}

#[web::post("/message")]
async fn send_message(
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let form: forms::chat::ChatMessageForm = forms::parse_body(&body)?;
    let exchange = api::chat::send_message(
        &form.microchip_number,
        &form.message,
        form.pet_info.as_ref(),
        &app_state.repo,
        &app_state.reply_chain,
    )
    .await?;

    Ok(web::HttpResponse::Ok().json(&json!({
        "success": true,
        "userMessage": message_json(&exchange.user_message),
        "aiMessage": message_json(&exchange.ai_message),
    })))
}

#[web::post("/send-to-doctor")]
async fn send_to_doctor(
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let form: forms::chat::SendToDoctorForm = forms::parse_body(&body)?;
    let message_id = api::doctor::send_to_doctor(
        &form.microchip_number,
        &form.summary,
        form.pet_info,
        &app_state.repo,
    )
    .await?;

    Ok(web::HttpResponse::Ok().json(&json!({
        "success": true,
        "message": "Message sent to doctor successfully",
        "messageId": message_id,
    })))
}

#[web::get("/doctor/pending")]
async fn list_pending_doctor_messages(
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let messages = api::doctor::list_pending(&app_state.repo).await?;

    Ok(web::HttpResponse::Ok().json(&json!({"success": true, "messages": messages})))
}

#[web::put("/doctor/message/{message_id}/read")]
async fn mark_doctor_message_read(
    path: web::types::Path<(String,)>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let message_id = forms::parse_id(&path.0, "Message not found")?;
    api::doctor::mark_read(message_id, &app_state.repo).await?;

    Ok(web::HttpResponse::Ok().json(&json!({
        "success": true,
        "message": "Message marked as read",
    })))
}
