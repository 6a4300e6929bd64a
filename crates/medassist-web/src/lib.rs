//! medassist-web: HTTP surface for the health assistant.
//!   - `GET /`            single-page chat UI
//!   - `POST /chat`       triage + generated reply
//!   - `GET /health-tips` static wellness tips

pub mod router;
pub mod handlers;
pub mod state;
