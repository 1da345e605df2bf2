use super::main_handlers::AppState;
use crate::ai::{self, AiService};
use crate::catalog;
use crate::error::AppError;
use crate::format;
use crate::middleware::authenticated_user;
use crate::models::{
    AddQaRequest, AddQaResponse, AskAiRequest, AskAiResponse, CategoriesResponse, QaListResponse,
    SaveAiQaRequest, SearchQuery, SearchResponse, StatsResponse,
};
use actix_web::{web, HttpRequest, HttpResponse, Result};

pub async fn get_stats(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let stats = data.store.stats()?;

    let response = StatsResponse {
        stats,
        student_categories: catalog::student_categories(),
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn search_qa(
    data: web::Data<AppState>,
    query: web::Query<SearchQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = authenticated_user(&req)?;
    let params = query.into_inner();

    let q = params
        .q
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if q.is_empty() {
        return Err(AppError::InvalidRequest(
            "Query parameter required".to_string(),
        ));
    }

    let results = data.store.search(&q, params.category.as_deref(), &user.id)?;

    let response = SearchResponse {
        count: results.len(),
        query: q,
        category: params.category,
        results,
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn get_all_qa(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = authenticated_user(&req)?;
    let qa_pairs = data.store.all_qa(&user.id)?;

    let response = QaListResponse {
        count: qa_pairs.len(),
        qa_pairs,
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn get_categories(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let response = CategoriesResponse {
        categories: data.store.categories()?,
        student_categories: catalog::student_categories(),
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn add_qa(
    data: web::Data<AppState>,
    request: web::Json<AddQaRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = authenticated_user(&req)?;
    let add_req = request.into_inner();

    let category = add_req.category.unwrap_or_else(|| "general".to_string());
    let entry = data.store.add_qa(
        &add_req.question,
        &add_req.answer,
        &category,
        add_req.tags.unwrap_or_default(),
    )?;

    tracing::info!("Q&A pair {} added by {}", entry.id, user.username);

    let response = AddQaResponse {
        success: true,
        id: entry.id,
        message: "Q&A pair added successfully".to_string(),
        added_by: user.username,
    };

    Ok(HttpResponse::Created().json(response))
}

pub async fn ask_ai(
    data: web::Data<AppState>,
    request: web::Json<AskAiRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    authenticated_user(&req)?;
    let ask_req = request.into_inner();

    let question = ask_req.question.trim().to_string();
    if question.is_empty() {
        return Err(AppError::InvalidRequest(
            "Question cannot be empty".to_string(),
        ));
    }

    let category = AiService::classify_category(&question);
    let context = data.store.relevant_context(&question, category)?;
    let ai_response = data.ai.generate_answer(&question, category, &context).await;

    let formatted_answer = match category {
        ai::MATH_CATEGORY => format::format_math_answer(&ai_response.answer),
        ai::PROGRAMMING_CATEGORY => format::format_code_answer(&ai_response.answer, "python"),
        _ => ai_response.answer.clone(),
    };

    let response = AskAiResponse {
        success: true,
        question,
        answer: formatted_answer,
        category: category.to_string(),
        confidence: ai_response.confidence,
        sources: ai_response.sources,
        reasoning: ai_response.reasoning,
        tools: format::category_tools(category),
        auto_classified: true,
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn save_ai_qa(
    data: web::Data<AppState>,
    request: web::Json<SaveAiQaRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = authenticated_user(&req)?;
    let save_req = request.into_inner();

    // Manual category override is allowed; otherwise classify the question
    let category = save_req
        .category
        .unwrap_or_else(|| AiService::classify_category(&save_req.question).to_string());

    let tags = save_req
        .tags
        .unwrap_or_else(|| vec![ai::AI_GENERATED_TAG.to_string()]);

    let entry = data
        .store
        .add_qa(&save_req.question, &save_req.answer, &category, tags)?;

    let response = serde_json::json!({
        "success": true,
        "id": entry.id,
        "message": "AI Q&A saved successfully",
        "category": category,
        "added_by": format!("AI + {}", user.username),
    });

    Ok(HttpResponse::Created().json(response))
}

pub async fn get_category_tools(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let category = path.into_inner();

    let response = serde_json::json!({
        "category": category,
        "tools": format::category_tools(&category),
    });

    Ok(HttpResponse::Ok().json(response))
}
