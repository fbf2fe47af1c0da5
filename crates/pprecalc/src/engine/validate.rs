//! Computed value validation.

use serde::Serialize;
use strum::{Display, IntoStaticStr};

/// Why a computed value was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, IntoStaticStr, Display)]
pub enum Rejection {
    #[strum(serialize = "pp is zero")]
    Zero,
    #[strum(serialize = "pp is NaN")]
    NaN,
    #[strum(serialize = "pp is infinite")]
    Infinite,
}

/// Accept a computed value, or say why it is garbage.
///
/// Zero and NaN are what the engine produces when it fails. Negative values
/// are passed through untouched.
pub fn validate(value: f32) -> Result<f32, Rejection> {
    if value.is_nan() {
        return Err(Rejection::NaN);
    }
    if value == 0.0 {
        return Err(Rejection::Zero);
    }
    if value.is_infinite() {
        return Err(Rejection::Infinite);
    }
    Ok(value)
}
