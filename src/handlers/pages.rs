use axum::{Extension, response::Html};

use crate::{models::session::SessionSnapshot, services::guard::View, views};

/// Renders the view chosen by `guard_navigation`.
pub async fn render_page(
    Extension(view): Extension<View>,
    Extension(snapshot): Extension<SessionSnapshot>,
) -> Html<String> {
    views::render(view, &snapshot)
}
