//! # Cat Image Generator
//!
//! This crate backs a small web application that fetches random cat photographs
//! from a third-party image search API, keeps a record of each one and lets the
//! user like, rename, browse and delete them.
//!
//! ## Features
//!
//! - **Generation**: ask the upstream API for a random image and store it under a
//!   randomly chosen title.
//! - **Record Store**: an in-memory, explicitly constructed store for image and
//!   user records. Nothing survives a restart.
//! - **Partial Updates**: typed `liked` / `title` updates that reject unknown fields.
//!
//! Images are referenced by their upstream URL only; the bytes are never fetched
//! or re-hosted.
//!
//! ## Usage
//!
//! ```no_run
//! use catgen::app::GenerateCatImageCommand;
//! use catgen::cat_api::CatApi;
//! use catgen::store::Store;
//!
//! async fn generate(api: &CatApi, store: &Store) {
//!     match GenerateCatImageCommand::new().execute(api, store).await {
//!         Ok(image) => println!("Generated {} at {}", image.title, image.image_url),
//!         Err(error) => eprintln!("Failed to generate cat image: {}", error),
//!     }
//! }
//! ```

pub mod app;
pub mod cat_api;
pub mod store;

pub mod prelude {
    pub use crate::app::*;
    pub use crate::cat_api::{CatApi, CatApiError, DEFAULT_BASE_URL};
    pub use crate::store::*;
}
