//! The bundled reference content pack.

use crate::catalog::ContentCatalog;
use crate::error::CoreResult;

/// Raw JSON of the "Therapy Simulator 1987" content pack.
pub const THERAPY_1987_JSON: &str = include_str!("../../../content/therapy_1987.json");

/// Parse and validate the bundled content pack.
pub fn therapy_1987() -> CoreResult<ContentCatalog> {
    ContentCatalog::from_json_str(THERAPY_1987_JSON)?.validated()
}
