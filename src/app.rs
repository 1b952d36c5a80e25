//! # Cat Image Operations
//!
//! This module is the single entry point the front ends (HTTP server and CLI)
//! use to work with cat image records. It pairs the in-memory [`Store`] with
//! the upstream [`CatApi`] and turns "nothing stored under this id" into a
//! typed [`AppError`].
//!
//! ## Provided Structures
//!
//! - **GenerateCatImageCommand**: fetches a random image URL from the upstream,
//!   picks a title from [`TITLES`] and stores the new record.
//!
//! ## Functions
//!
//! - **list_images**: every record, newest first.
//! - **find_image**: one record by id.
//! - **update_image**: shallow merge of `liked` / `title`.
//! - **remove_image**: deletes one record.
//!
//! Ids arrive as strings from the outside world. A string that is not a valid
//! id can never name a stored record, so it is reported as not found.

use crate::{
    cat_api::{CatApi, CatApiError},
    store::{ImageRecord, ImageUpdate, NewImage, Store},
};
use rand::seq::SliceRandom;
use tracing::{debug, info};
use uuid::Uuid;

/// Candidate titles for generated images.
pub const TITLES: [&str; 10] = [
    "Adorable Whiskers",
    "Fluffy Explorer",
    "Curious Kitten",
    "Majestic Feline",
    "Sleepy Companion",
    "Playful Paws",
    "Royal Cat",
    "Sweet Dreams",
    "Adventure Seeker",
    "Cozy Cuddles",
];

/// Picks one of [`TITLES`] uniformly at random.
pub fn random_title() -> &'static str {
    TITLES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(TITLES[0])
}

/// Represents a request to generate and store a new cat image.
///
/// The title is drawn at random unless one is pinned with `with_title`.
#[derive(Debug, Default)]
pub struct GenerateCatImageCommand {
    /// Fixed title to use instead of a random one.
    pub title: Option<String>,
}

impl GenerateCatImageCommand {
    pub fn new() -> Self {
        GenerateCatImageCommand { title: None }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Executes the generation.
    ///
    /// The upstream is asked for one random image; its URL becomes both the
    /// image and the thumbnail URL of a new, un-liked record.
    ///
    /// # Arguments
    ///
    /// * `api` - Upstream client used to find an image.
    /// * `store` - Store receiving the new record.
    ///
    /// # Returns
    ///
    /// Returns the stored `ImageRecord`, or an `AppError` if the upstream call failed.
    /// Nothing is stored on failure.
    pub async fn execute(self, api: &CatApi, store: &Store) -> Result<ImageRecord, AppError> {
        let image_url = api.fetch_image_url().await?;
        let title = self.title.unwrap_or_else(|| random_title().to_string());

        let record = store.create_image(
            NewImage::new(&title, &image_url)
                .with_thumbnail_url(&image_url)
                .with_liked(false),
        );
        info!(
            id = %record.id,
            url = %record.image_url,
            total = store.image_count(),
            "generated cat image"
        );

        Ok(record)
    }
}

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::ImageNotFound { id: id.to_string() })
}

/// Returns every stored image, newest first.
pub fn list_images(store: &Store) -> Vec<ImageRecord> {
    store.list_images()
}

/// Retrieves one image by its id.
///
/// # Returns
///
/// Returns the record or `AppError::ImageNotFound`.
pub fn find_image(store: &Store, id: &str) -> Result<ImageRecord, AppError> {
    store
        .get_image(&parse_id(id)?)
        .ok_or_else(|| AppError::ImageNotFound { id: id.to_string() })
}

/// Applies a partial update to one image.
///
/// Fields absent from `update` keep their current value.
///
/// # Arguments
///
/// * `store` - Store holding the image.
/// * `id` - Id of the image to change.
/// * `update` - Fields to overwrite.
///
/// # Returns
///
/// Returns the updated record or `AppError::ImageNotFound`.
pub fn update_image(store: &Store, id: &str, update: ImageUpdate) -> Result<ImageRecord, AppError> {
    let record = store
        .update_image(&parse_id(id)?, update)
        .ok_or_else(|| AppError::ImageNotFound { id: id.to_string() })?;
    debug!(id = %record.id, liked = record.liked, "updated cat image");

    Ok(record)
}

/// Deletes one image.
///
/// # Returns
///
/// Returns `AppError::ImageNotFound` if nothing was deleted.
pub fn remove_image(store: &Store, id: &str) -> Result<(), AppError> {
    if store.delete_image(&parse_id(id)?) {
        debug!(id, "deleted cat image");
        Ok(())
    } else {
        Err(AppError::ImageNotFound { id: id.to_string() })
    }
}

/// Errors raised by cat image operations.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    CatApi(#[from] CatApiError),

    #[error("cat image not found: {id}")]
    ImageNotFound { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cat_api::tests::stub_upstream;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn api_returning(body: serde_json::Value) -> CatApi {
        let base = stub_upstream(StatusCode::OK, body).await;
        CatApi::new(Some("secret".to_string())).with_base_url(&base)
    }

    #[test]
    fn test_random_title_is_from_list() {
        for _ in 0..50 {
            assert!(TITLES.contains(&random_title()));
        }
    }

    #[tokio::test]
    async fn test_generate() {
        let store = Store::new();
        let api = api_returning(json!([{"url": "https://example.com/cat1.jpg"}])).await;

        let image = GenerateCatImageCommand::new()
            .execute(&api, &store)
            .await
            .unwrap();

        assert!(!image.liked);
        assert_eq!("https://example.com/cat1.jpg", image.image_url);
        assert_eq!(Some(image.image_url.clone()), image.thumbnail_url);
        assert!(TITLES.contains(&image.title.as_str()));
        assert_eq!(vec![image], list_images(&store));
    }

    #[tokio::test]
    async fn test_generate_with_title() {
        let store = Store::new();
        let api = api_returning(json!([{"url": "https://example.com/cat1.jpg"}])).await;

        let image = GenerateCatImageCommand::new()
            .with_title("Tabby")
            .execute(&api, &store)
            .await
            .unwrap();

        assert_eq!("Tabby", image.title);
    }

    #[tokio::test]
    async fn test_generate_failure_stores_nothing() {
        let store = Store::new();
        let api = api_returning(json!([])).await;

        let err = GenerateCatImageCommand::new()
            .execute(&api, &store)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CatApi(CatApiError::NoImage)));
        assert_eq!(0, store.image_count());
    }

    #[test]
    fn test_find_image() {
        let store = Store::new();
        let image = store.create_image(NewImage::new("Royal Cat", "https://example.com/cat.jpg"));

        assert_eq!(image, find_image(&store, &image.id.to_string()).unwrap());
        assert!(matches!(
            find_image(&store, "unknown-id"),
            Err(AppError::ImageNotFound { id }) if id == "unknown-id"
        ));
        assert!(matches!(
            find_image(&store, &Uuid::new_v4().to_string()),
            Err(AppError::ImageNotFound { .. })
        ));
    }

    #[test]
    fn test_update_image() {
        let store = Store::new();
        let image = store.create_image(NewImage::new("Royal Cat", "https://example.com/cat.jpg"));
        let id = image.id.to_string();

        let renamed = update_image(
            &store,
            &id,
            ImageUpdate {
                liked: None,
                title: Some("X".to_string()),
            },
        )
        .unwrap();
        assert_eq!("X", renamed.title);
        assert!(!renamed.liked);

        let liked = update_image(
            &store,
            &id,
            ImageUpdate {
                liked: Some(true),
                title: None,
            },
        )
        .unwrap();
        assert_eq!("X", liked.title);
        assert!(liked.liked);

        assert!(matches!(
            update_image(&store, "unknown-id", ImageUpdate::default()),
            Err(AppError::ImageNotFound { .. })
        ));
    }

    #[test]
    fn test_remove_image_twice() {
        let store = Store::new();
        let image = store.create_image(NewImage::new("Royal Cat", "https://example.com/cat.jpg"));
        let id = image.id.to_string();

        assert!(remove_image(&store, &id).is_ok());
        assert!(matches!(
            remove_image(&store, &id),
            Err(AppError::ImageNotFound { .. })
        ));
    }
}
