//! Movement input rules.
//!
//! A movement is a scanned cart barcode plus a scanned location code plus the
//! fill status the operator declared. Barcodes are opaque text; a camera scan
//! and keyboard entry produce the same input.

use crate::error::CoreError;

/// Maximum length of a cart barcode.
pub const MAX_CART_BARCODE_LEN: usize = 64;

/// Default number of movement log entries returned by a history query.
pub const DEFAULT_HISTORY_LIMIT: i64 = 100;

/// Upper bound on the number of movement log entries per history query.
pub const MAX_HISTORY_LIMIT: i64 = 500;

/// Validate and trim a cart barcode.
pub fn validate_cart_barcode(raw: &str) -> Result<String, CoreError> {
    let barcode = raw.trim();
    if barcode.is_empty() {
        return Err(CoreError::Validation(
            "Cart barcode must not be empty".into(),
        ));
    }
    if barcode.chars().count() > MAX_CART_BARCODE_LEN {
        return Err(CoreError::Validation(format!(
            "Cart barcode must be at most {MAX_CART_BARCODE_LEN} characters"
        )));
    }
    if barcode.chars().any(char::is_control) {
        return Err(CoreError::Validation(
            "Cart barcode must not contain control characters".into(),
        ));
    }
    Ok(barcode.to_string())
}

/// Clamp a requested history page size into `1..=MAX_HISTORY_LIMIT`.
pub fn clamp_history_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}
