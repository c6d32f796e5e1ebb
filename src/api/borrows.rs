//! Borrow management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{
        Borrow, BorrowDetails, BorrowFilter, CreateBorrowRequest, UpdateBorrowRequest,
    },
};

use super::{ApiResponse, AuthenticatedUser};

fn listing_message(found: bool) -> &'static str {
    if found {
        "Borrow found"
    } else {
        "Borrow not found"
    }
}

/// List all borrows with optional filters (staff)
#[utoipa::path(
    get,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(BorrowFilter),
    responses(
        (status = 200, description = "Filtered borrows, newest first", body = ApiResponse<Vec<BorrowDetails>>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not staff")
    )
)]
pub async fn list_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(filter): Query<BorrowFilter>,
) -> AppResult<Json<ApiResponse<Vec<BorrowDetails>>>> {
    claims.require_staff()?;

    let borrows = state.services.borrows.all(&filter).await?;

    Ok(Json(ApiResponse::new(
        listing_message(!borrows.is_empty()),
        borrows,
    )))
}

/// List the authenticated user's own borrows
#[utoipa::path(
    get,
    path = "/borrows/mine",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's borrows with books", body = ApiResponse<Vec<BorrowDetails>>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<BorrowDetails>>>> {
    let borrows = state.services.borrows.my_borrows(claims.user_id).await?;

    Ok(Json(ApiResponse::new("Borrow found", borrows)))
}

/// Get borrow details by ID
#[utoipa::path(
    get,
    path = "/borrows/{id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow ID")
    ),
    responses(
        (status = 200, description = "Borrow with books and status", body = ApiResponse<BorrowDetails>),
        (status = 404, description = "Borrow not found")
    )
)]
pub async fn get_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(borrow_id): Path<i32>,
) -> AppResult<Json<ApiResponse<BorrowDetails>>> {
    claims.require_staff()?;

    let borrow = state.services.borrows.detail(borrow_id).await?;

    Ok(Json(ApiResponse::new("Borrow found", borrow)))
}

/// Create a new borrow (staff)
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = CreateBorrowRequest,
    responses(
        (status = 201, description = "Borrow created", body = ApiResponse<Borrow>),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "User or book not found"),
        (status = 409, description = "A requested book has no available copy")
    )
)]
pub async fn create_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBorrowRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Borrow>>)> {
    claims.require_staff()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let borrow = state.services.borrows.create(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Book borrowed successfully", borrow)),
    ))
}

/// Update a borrow (staff, administrative)
#[utoipa::path(
    put,
    path = "/borrows/{id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow ID")
    ),
    request_body = UpdateBorrowRequest,
    responses(
        (status = 200, description = "Borrow updated", body = ApiResponse<Borrow>),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Borrow not found")
    )
)]
pub async fn update_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(borrow_id): Path<i32>,
    Json(request): Json<UpdateBorrowRequest>,
) -> AppResult<Json<ApiResponse<Borrow>>> {
    claims.require_staff()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let borrow = state.services.borrows.update(borrow_id, &request).await?;

    Ok(Json(ApiResponse::new("Borrow updated successfully", borrow)))
}

/// Return a borrowed book set (staff)
#[utoipa::path(
    post,
    path = "/borrows/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow ID")
    ),
    responses(
        (status = 200, description = "Borrow returned", body = ApiResponse<Borrow>),
        (status = 404, description = "Borrow not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(borrow_id): Path<i32>,
) -> AppResult<Json<ApiResponse<Borrow>>> {
    claims.require_staff()?;

    let borrow = state.services.borrows.return_book(borrow_id).await?;

    Ok(Json(ApiResponse::new("Borrow returned successfully", borrow)))
}
