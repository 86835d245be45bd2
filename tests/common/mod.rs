//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, TestClient, PNG_FRAME};
//! use emotune_server::Emotion;
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_analyze_frame() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     server.classifier.set(Some(Emotion::Happy));
//!     let response = client.analyze_frame(PNG_FRAME).await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod constants;
mod fakes;
mod fixtures;
mod server;

// Public API - this is what tests import
pub use client::TestClient;
pub use constants::*;
#[allow(unused_imports)]
pub use fakes::{ScriptedClassifier, StubResolver};
pub use server::TestServer;
