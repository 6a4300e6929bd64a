//! Single-page chat UI.

use axum::response::Html;

pub async fn index_page() -> Html<&'static str> {
    Html(include_str!("../../templates/index.html"))
}
