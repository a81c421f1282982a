// openqmc

/// Largest representable float below one.
pub const ONE_MINUS_EPSILON: f32 = 0.99999994;

/// Convert a full range 32 bit unsigned integer into a float within
/// the range `[0, 1)`. The scale is 1/2^32; results that would round up
/// to one are clamped to the largest float below it. Not all integer
/// inputs are representable, so this is a lossy operation.
pub fn uint_to_float(value: u32) -> f32 {
    (value as f32 * 2.3283064365386963e-10).min(ONE_MINUS_EPSILON)
}
