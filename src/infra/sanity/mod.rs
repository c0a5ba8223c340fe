//! Adapter for the hosted headless CMS: query client, GROQ queries, asset
//! URL builders and the [`ContentRepo`](crate::application::repos::ContentRepo)
//! implementation.

mod client;
pub mod queries;
mod repository;
mod urls;

pub use client::SanityClient;
pub use repository::SanityRepository;
pub use urls::{SanityFileUrlResolver, SanityImageUrlBuilder};
