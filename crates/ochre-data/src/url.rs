//! Asset URL templates understood by the downstream asset services.
//!
//! The exact shape of these URLs is part of the output contract.

use uuid::Uuid;

/// Base address of the OCHRE asset service.
pub const OCHRE_BASE_URL: &str = "https://ochre.lib.uchicago.edu/ochre";

/// URL that loads the full asset for `uuid`.
pub fn load_url(uuid: &Uuid) -> String {
    format!("{}?uuid={}&load", OCHRE_BASE_URL, uuid)
}

/// URL that loads the preview (thumbnail) asset for `uuid`.
pub fn preview_url(uuid: &Uuid) -> String {
    format!("{}?uuid={}&preview", OCHRE_BASE_URL, uuid)
}
