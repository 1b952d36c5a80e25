use crate::AppState;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{Method, StatusCode},
    response::IntoResponse,
};
use catgen::{
    app::{self, AppError, GenerateCatImageCommand},
    cat_api::CatApiError,
    store::{ImageRecord, ImageUpdate},
};
use serde::Serialize;
use tracing::{debug, error};

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn generate_image(
    State(state): State<AppState>,
) -> Result<Json<ImageRecord>, ImageError> {
    let image = GenerateCatImageCommand::new()
        .execute(&state.api, &state.store)
        .await?;

    Ok(Json(image))
}

pub async fn get_images(State(state): State<AppState>) -> Json<Vec<ImageRecord>> {
    Json(app::list_images(&state.store))
}

pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ImageRecord>, ImageError> {
    Ok(Json(app::find_image(&state.store, &id)?))
}

/// Applies a `{liked?, title?}` update.
///
/// The body is decoded before the id is looked up, so a malformed body is
/// reported even for an unknown id.
pub async fn patch_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ImageUpdate>, JsonRejection>,
) -> Result<Json<ImageRecord>, ImageError> {
    let Json(update) = payload.map_err(|e| ImageError::InvalidPayload(e.body_text()))?;

    Ok(Json(app::update_image(&state.store, &id, update)?))
}

/// Non-POST requests to `/api/cat-images/generate`.
///
/// `generate` fills the `{id}` slot for these methods and no record has that
/// id, so they end as not found. PATCH still decodes its body first.
pub async fn generate_segment_as_id(
    method: Method,
    payload: Result<Json<ImageUpdate>, JsonRejection>,
) -> ImageError {
    if method == Method::PATCH {
        if let Err(e) = payload {
            return ImageError::InvalidPayload(e.body_text());
        }
    }

    ImageError::NotFound {
        id: "generate".to_string(),
    }
}

pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ImageError> {
    app::remove_image(&state.store, &id)?;

    Ok(Json(MessageResponse {
        message: "Cat image deleted successfully".to_string(),
    }))
}

#[derive(Debug)]
pub enum ImageError {
    NotFound { id: String },

    /// The upstream call behind `generate` failed.
    Generate(CatApiError),

    /// The PATCH body is not a valid update. Reported as 500, not 400.
    InvalidPayload(String),
}

impl From<AppError> for ImageError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::ImageNotFound { id } => ImageError::NotFound { id },
            AppError::CatApi(e) => ImageError::Generate(e),
        }
    }
}

impl IntoResponse for ImageError {
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            message: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<String>,
        }

        let (status, message, detail) = match self {
            ImageError::NotFound { id } => {
                debug!(id, "cat image not found");
                (StatusCode::NOT_FOUND, "Cat image not found", None)
            }
            ImageError::Generate(cat_api_error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate cat image",
                Some(cat_api_error.to_string()),
            ),
            ImageError::InvalidPayload(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update cat image",
                Some(reason),
            ),
        };

        if status.is_server_error() {
            error!(detail = detail.as_deref().unwrap_or_default(), "{message}");
        }

        (
            status,
            Json(ErrorResponse {
                message: message.to_string(),
                error: detail,
            }),
        )
            .into_response()
    }
}
