//! HTTP front end for a shared conversation.
//!
//! `POST /chat` runs one turn, `GET /devices` lists the known lights and
//! `GET /health` answers liveness probes.

mod error;
mod routes;
mod state;

pub use error::{ApiError, ErrorBody};
pub use routes::{router, serve, ChatRequest, ChatResponse, MAX_BODY_BYTES};
pub use state::AppState;
