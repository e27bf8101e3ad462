use log::{debug, warn};

use crate::engine::errors::EngineError;

/// Largest answer the engine accepts
pub const MAX_TARGET: i64 = i32::MAX as i64;

/// # Errors
///
/// Returns [`EngineError::InvalidTarget`] unless `target` lies in `1..=MAX_TARGET`.
pub fn validate_target(target: i64) -> Result<(), EngineError> {
    debug!("Validating target: {}", target);

    if !(1..=MAX_TARGET).contains(&target) {
        warn!("Target {} is outside 1..={}", target, MAX_TARGET);
        return Err(EngineError::InvalidTarget {
            target,
            max: MAX_TARGET,
        });
    }

    Ok(())
}

/// # Errors
///
/// Returns [`EngineError::InvalidDepth`] if `max_depth` is zero.
pub fn validate_depth(max_depth: u32) -> Result<(), EngineError> {
    debug!("Validating maximum depth: {}", max_depth);

    if max_depth < 1 {
        warn!("Maximum depth must be at least 1");
        return Err(EngineError::InvalidDepth(max_depth));
    }

    Ok(())
}
