use axum::Json;

use crate::ui::{ControlDeclarations, declarations};

pub(crate) async fn controls() -> Json<ControlDeclarations> {
    Json(declarations())
}
