//! # Remote API Module
//!
//! HTTP access to the Harmonia REST backend. Everything that leaves the
//! process goes through here.
//!
//! ## Architecture
//!
//! ```text
//! Managers (songs, albums, playlists, ...)
//!          ↓
//! MusicService (typed endpoints)
//!          ↓
//! Transport
//!     ├── AuthInterceptor     (client header + bearer token)
//!     ├── reqwest::Client     (send)
//!     ├── TokenAuthenticator  (401 → refresh once → retry once)
//!     └── retry on 429/502/503/504
//!          ↓
//! Harmonia REST API
//! ```
//!
//! ## Authentication Strategy
//!
//! The session holds an access/refresh token pair. Before a request is sent
//! the transport refreshes proactively when the access token is known to be
//! close to expiry. When the server still answers `401`, the
//! [`TokenAuthenticator`] runs three guards:
//! 1. **Loop prevention**: a second `401` in the same chain is final
//! 2. **Endpoint exclusion**: `Auth/Refresh` and `Auth/Google` never refresh
//! 3. **No token, no retry**: a request that carried no bearer token is final
//!
//! It then refreshes once and replays the request with the new token. A
//! failed refresh clears the session, and the caller sees
//! [`crate::error::ApiError::SessionExpired`].
//!
//! Concurrent `401`s share a single refresh: the session serializes
//! refreshes, and callers that queued behind one take its outcome. After a
//! success they retry with the new token; after a failure they give up
//! without asking the server again. A refresh token the server rejected is
//! not sent a second time.
//!
//! ## Token Endpoints
//!
//! [`AuthApi`] talks to `Auth/Refresh` and `Auth/Google` with its own HTTP
//! client. It never goes through the interceptor, so a refresh can not wait
//! on itself.
//!
//! ## Presigned URLs
//!
//! Media objects are served from object storage through presigned URLs.
//! [`MusicService`] exposes the batch resolution endpoints; the
//! [`crate::enrich`] module decides what to ask for.

pub mod auth;
mod authenticator;
mod client;
pub(crate) mod http;
mod interceptor;
mod service;

pub use auth::AuthApi;
pub use authenticator::{MAX_AUTH_RESPONSES, TokenAuthenticator};
pub use client::ApiClient;
pub use http::CLIENT_NAME_HEADER;
pub use interceptor::{AuthInterceptor, bearer_token};
pub use service::MusicService;
