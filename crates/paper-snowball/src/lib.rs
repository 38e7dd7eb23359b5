//! Paper Snowball
//!
//! Client for a scholarly search backend that finds papers across providers
//! (Semantic Scholar, arXiv, DOAJ) and follows their references one or two
//! levels deep.
//!
//! # Features
//!
//! - **Shape-tolerant decoding**: search and reference payloads in several
//!   envelope shapes are normalized into one canonical [`models::Paper`]
//! - **Reference snowballing**: depth-capped reference trees
//! - **Latest-request-wins views**: superseded requests are aborted and stale
//!   results never overwrite newer ones
//! - **Cached suggestions**: 10-minute TTL cache for title suggestions
//!
//! # Example
//!
//! ```no_run
//! use paper_snowball::{actions, client::ScholarClient, config::Config, models::Provider};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = ScholarClient::new(config)?;
//!
//!     let papers = actions::perform_search(&client, "attention", None, Provider::ArxivPapers)
//!         .await?;
//!     println!("{} papers", papers.len());
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod models;
pub mod normalize;
pub mod view;

pub use client::ScholarClient;
pub use config::Config;
pub use error::{ClientError, RequestError};
