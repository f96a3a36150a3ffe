use std::fmt::Debug;

use crate::error::IntegrityError;

/// Platform component able to compute the browser exam key itself, e.g. from a signed binary.
pub trait IntegrityModule: Send + Sync + Debug {
    /// # Errors
    /// [`IntegrityError::Module`] when the module is unavailable or refuses; the generator then
    /// falls back to its own derivation.
    fn try_calculate_browser_exam_key(&self, configuration_key: &str, salt: &[u8]) -> Result<String, IntegrityError>;
}
