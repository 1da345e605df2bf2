use super::main_handlers::AppState;
use crate::error::AppError;
use crate::middleware::authenticated_user;
use crate::models::{
    AddReplyRequest, RepliesResponse, ReplyResponse, ToggleHelpfulResponse, UpdateReplyRequest,
};
use actix_web::{web, HttpRequest, HttpResponse, Result};

pub async fn get_replies(
    data: web::Data<AppState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = authenticated_user(&req)?;
    let qa_id = path.into_inner();

    let replies = data.store.replies_for(&qa_id, &user.id)?;

    let response = RepliesResponse {
        qa_id,
        count: replies.len(),
        replies,
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn add_reply(
    data: web::Data<AppState>,
    request: web::Json<AddReplyRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = authenticated_user(&req)?;
    let add_req = request.into_inner();

    let reply = data.store.add_reply(
        &add_req.qa_id,
        &user,
        &add_req.content,
        add_req.parent_reply_id,
    )?;

    tracing::info!("Reply {} added to Q&A {} by {}", reply.id, reply.qa_id, user.username);

    let response = ReplyResponse {
        success: true,
        reply: reply.view(&user.id),
        message: "Reply added successfully".to_string(),
    };

    Ok(HttpResponse::Created().json(response))
}

pub async fn toggle_helpful(
    data: web::Data<AppState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = authenticated_user(&req)?;
    let reply_id = path.into_inner();

    let reply = data.store.toggle_helpful(&reply_id, &user.id)?;

    let response = ToggleHelpfulResponse {
        success: true,
        reply_id,
        is_helpful: reply.is_helpful_for(&user.id),
        helpful_votes: reply.helpful_votes(),
        message: "Helpful status updated".to_string(),
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn update_reply(
    data: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<UpdateReplyRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = authenticated_user(&req)?;
    let reply_id = path.into_inner();
    let update_req = request.into_inner();

    let reply = data
        .store
        .update_reply(&reply_id, &user.id, &update_req.content)?;

    let response = ReplyResponse {
        success: true,
        reply: reply.view(&user.id),
        message: "Reply updated successfully".to_string(),
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn delete_reply(
    data: web::Data<AppState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = authenticated_user(&req)?;
    let reply_id = path.into_inner();

    data.store.delete_reply(&reply_id, &user.id)?;

    let response = serde_json::json!({
        "success": true,
        "message": "Reply deleted successfully",
    });

    Ok(HttpResponse::Ok().json(response))
}
