//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{borrows, health};
use crate::error::ErrorResponse;
use crate::models::{
    book::BookShort,
    borrow::{Borrow, BorrowDetails, BorrowStatusShort, CreateBorrowRequest, UpdateBorrowRequest},
    penalty::Penalty,
    user::UserShort,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lendly API",
        version = "1.0.0",
        description = "Library Borrowing Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Borrows
        borrows::list_borrows,
        borrows::my_borrows,
        borrows::get_borrow,
        borrows::create_borrow,
        borrows::update_borrow,
        borrows::return_borrow,
    ),
    components(
        schemas(
            health::HealthResponse,
            ErrorResponse,
            Borrow,
            BorrowDetails,
            BorrowStatusShort,
            CreateBorrowRequest,
            UpdateBorrowRequest,
            BookShort,
            UserShort,
            Penalty,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "borrows", description = "Borrowing lifecycle and listings")
    )
)]
pub struct ApiDoc;

/// Swagger UI router serving the generated OpenAPI document
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
