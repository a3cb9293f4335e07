/// Company endpoints
///
/// All company endpoints require JWT authentication.
///
/// # Endpoints
///
/// - `POST /Api/company/create` - Create a company
/// - `GET /Api/company/read/:id` - Read a company
/// - `GET /Api/company/list` - List companies
/// - `PUT /Api/company/update/:id` - Update a company
/// - `DELETE /Api/company/delete/:id` - Delete a company

use crate::{
    app::AppState,
    error::ApiResult,
    extract::Payload,
    routes::{parse_id, Created},
    serializers::CompanyView,
    validators::company::{CreateCompanyRequest, UpdateCompanyRequest},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use orderly_shared::{
    auth::middleware::AuthContext,
    models::{company::Company, ListParams},
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct CompanyBody {
    pub company: CompanyView,
}

#[derive(Debug, Serialize)]
pub struct CompaniesBody {
    pub companies: Vec<CompanyView>,
}

/// Create a company
///
/// # Endpoint
///
/// ```text
/// POST /Api/company/create
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "company": {
///     "company_name": "Acme",
///     ...
///     "is_licensed": true,
///     "target_markets": ["EU", "ASIA"]
///   }
/// }
/// ```
///
/// List fields may also be sent as a string holding a JSON array, which is
/// how form-encoded clients send them.
///
/// # Errors
///
/// - `400 Bad Request`: Body could not be parsed
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `422 Unprocessable Entity`: Validation failed or a list field is malformed
pub async fn create_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Payload(req): Payload<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<Created<CompanyBody>>)> {
    let record = req.bind()?;
    let company = Company::create(&state.db, record).await?;

    info!(company_id = %company.id, created_by = %auth.user_id, "Company created");

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: "Company created successfully".to_string(),
            record: CompanyBody {
                company: CompanyView::try_from(&company)?,
            },
        }),
    ))
}

/// Read a company
///
/// # Errors
///
/// - `404 Not Found`: No such company
/// - `500 Internal Server Error`: A stored list field could not be decoded
pub async fn read_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CompanyBody>> {
    let id = parse_id("company", &id)?;
    let company = Company::get(&state.db, id).await?;

    Ok(Json(CompanyBody {
        company: CompanyView::try_from(&company)?,
    }))
}

pub async fn list_companies(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<CompaniesBody>> {
    let companies = Company::list(&state.db, params).await?;

    Ok(Json(CompaniesBody {
        companies: CompanyView::many(&companies)?,
    }))
}

pub async fn update_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Payload(req): Payload<UpdateCompanyRequest>,
) -> ApiResult<Json<CompanyBody>> {
    let id = parse_id("company", &id)?;
    let patch = req.bind()?;
    let company = Company::update(&state.db, id, patch).await?;

    info!(company_id = %company.id, updated_by = %auth.user_id, "Company updated");

    Ok(Json(CompanyBody {
        company: CompanyView::try_from(&company)?,
    }))
}

pub async fn delete_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id("company", &id)?;
    Company::delete(&state.db, id).await?;

    info!(company_id = %id, deleted_by = %auth.user_id, "Company deleted");

    Ok(StatusCode::NO_CONTENT)
}
