//! Handlers for the `/projects` resource.
//!
//! Reads and quotes are public; writes require the admin role. Draft
//! projects exist only for admins: anyone else gets a 404 for them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use centace_core::error::CoreError;
use centace_core::pricing::{quote, Quote, MONEY_DP};
use centace_core::project::{
    validate_share_counts, validate_text, ProjectCategory, ProjectStatus, Tier, STATUS_DRAFT,
};
use centace_core::types::{DbId, Money};
use centace_db::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};
use centace_db::repositories::ProjectRepo;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_NAME_LEN: usize = 200;
const MAX_LOCATION_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 5_000;

/// A project plus what its tier entitles an investor to.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub ownership_rights: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    pub shares: i32,
}

/// GET /api/v1/projects
///
/// Only admins may ask for `status=draft`.
pub async fn list(
    auth: Result<AuthUser, AppError>,
    State(state): State<AppState>,
    Query(filter): Query<ProjectFilter>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    if let Some(category) = &filter.category {
        ProjectCategory::from_str(category)?;
    }
    if let Some(status) = &filter.status {
        ProjectStatus::from_str(status)?;
        if status == STATUS_DRAFT && !is_admin(&auth) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Draft projects are visible to admins only".into(),
            )));
        }
    }
    if let Some(tier) = &filter.tier {
        Tier::from_str(tier)?;
    }
    let projects = ProjectRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    auth: Result<AuthUser, AppError>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let project = find_visible_or_404(&state, id, &auth).await?;
    let ownership_rights = Tier::from_str(&project.tier)?.ownership_rights();
    Ok(Json(DataResponse {
        data: ProjectDetail {
            project,
            ownership_rights,
        },
    }))
}

/// GET /api/v1/projects/{id}/quote?shares=N
///
/// Price a prospective purchase without committing to it.
pub async fn get_quote(
    auth: Result<AuthUser, AppError>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<QuoteParams>,
) -> AppResult<Json<DataResponse<Quote>>> {
    let project = find_visible_or_404(&state, id, &auth).await?;
    let q = quote(project.price_per_share, params.shares, project.available_shares);
    Ok(Json(DataResponse { data: q }))
}

/// POST /api/v1/projects
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    validate_text("name", &input.name, MAX_NAME_LEN)?;
    validate_text("location", &input.location, MAX_LOCATION_LEN)?;
    if let Some(description) = &input.description {
        validate_text("description", description, MAX_DESCRIPTION_LEN)?;
    }
    ProjectCategory::from_str(&input.category)?;
    if let Some(status) = &input.status {
        ProjectStatus::from_str(status)?;
    }
    if let Some(tier) = &input.tier {
        Tier::from_str(tier)?;
    }
    validate_price(input.price_per_share)?;
    validate_share_counts(
        input.total_shares,
        input.available_shares.unwrap_or(input.total_shares),
    )?;

    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = project.id, admin_id = admin.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let current = find_or_404(&state, id).await?;

    if let Some(name) = &input.name {
        validate_text("name", name, MAX_NAME_LEN)?;
    }
    if let Some(location) = &input.location {
        validate_text("location", location, MAX_LOCATION_LEN)?;
    }
    if let Some(description) = &input.description {
        validate_text("description", description, MAX_DESCRIPTION_LEN)?;
    }
    if let Some(category) = &input.category {
        ProjectCategory::from_str(category)?;
    }
    if let Some(status) = &input.status {
        ProjectStatus::from_str(status)?;
    }
    if let Some(tier) = &input.tier {
        Tier::from_str(tier)?;
    }
    if let Some(price) = input.price_per_share {
        validate_price(price)?;
    }
    validate_share_counts(
        input.total_shares.unwrap_or(current.total_shares),
        input.available_shares.unwrap_or(current.available_shares),
    )?;

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    tracing::info!(project_id = id, admin_id = admin.user_id, "Project updated");
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Projects with investments cannot be deleted (409).
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProjectRepo::delete(&state.pool, id).await? {
        tracing::info!(project_id = id, admin_id = admin.user_id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}

async fn find_or_404(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// Like [`find_or_404`], but a draft is only found by an admin.
async fn find_visible_or_404(
    state: &AppState,
    id: DbId,
    auth: &Result<AuthUser, AppError>,
) -> AppResult<Project> {
    let project = find_or_404(state, id).await?;
    if project.is_draft() && !is_admin(auth) {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }
    Ok(project)
}

/// A missing or invalid token on a public route just means "not an admin".
fn is_admin(auth: &Result<AuthUser, AppError>) -> bool {
    auth.as_ref().is_ok_and(AuthUser::is_admin)
}

fn validate_price(price: Money) -> Result<(), CoreError> {
    if price <= Decimal::ZERO {
        return Err(CoreError::Validation(
            "price_per_share must be greater than 0".to_string(),
        ));
    }
    if price.normalize().scale() > MONEY_DP {
        return Err(CoreError::Validation(format!(
            "price_per_share must have at most {MONEY_DP} decimal places"
        )));
    }
    Ok(())
}
