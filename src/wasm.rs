//! WebAssembly bindings for isolation-kernel.
//!
//! This module provides JavaScript-compatible bindings. It's only compiled
//! when the `wasm` feature is enabled.
//!
//! # Usage Example
//!
//! ```javascript
//! import init, { build_similarity, build_features } from 'isolation-kernel';
//!
//! await init();
//!
//! const data = [[0.0, 0.0], [0.1, 0.0], [5.0, 5.0], [5.1, 5.0]];
//!
//! // 4×4 similarity, flattened row-major; psi = 2, t = 100, seed = 42
//! const sim = build_similarity(data, 2, 100, 42n);
//!
//! // Per-point cell indices, one per partition
//! const cells = build_features(data, 2, 100, 42n);
//! ```
//!
//! # Input Format
//!
//! - **Points**: Arrays of vectors `[[f32, ...], [f32, ...], ...]`
//! - **Seed**: `BigInt` (u64). JavaScript has no ambient seeded generator,
//!   so every call takes one explicitly.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;

use crate::{kernel, KernelConfig};

/// Helper to convert JS array of numbers to Vec<f32>
fn js_to_vec_f32(js: &JsValue) -> Result<Vec<f32>, JsValue> {
    use wasm_bindgen::JsCast;

    let array = js
        .dyn_ref::<js_sys::Array>()
        .ok_or_else(|| JsValue::from_str("Expected array"))?;

    let mut vec = Vec::with_capacity(array.length() as usize);
    for (idx, item) in array.iter().enumerate() {
        let val = item
            .as_f64()
            .ok_or_else(|| JsValue::from_str(&format!("Expected number at index {}", idx)))?;
        vec.push(val as f32);
    }
    Ok(vec)
}

/// Helper to convert JS array of arrays to Vec<Vec<f32>>
fn js_to_points(js: &JsValue) -> Result<Vec<Vec<f32>>, JsValue> {
    use wasm_bindgen::JsCast;

    let array = js
        .dyn_ref::<js_sys::Array>()
        .ok_or_else(|| JsValue::from_str("Expected array of points"))?;

    let mut points = Vec::with_capacity(array.length() as usize);
    for (idx, item) in array.iter().enumerate() {
        let point = js_to_vec_f32(&item)
            .map_err(|e| JsValue::from_str(&format!("Invalid point at index {}: {:?}", idx, e)))?;
        points.push(point);
    }
    Ok(points)
}

fn to_js_error(err: crate::KernelError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Isolation Kernel self-similarity.
///
/// # Arguments
/// * `data` - Points as array of arrays
/// * `cells` - Centers per partition (ψ), `1..=data.length`
/// * `diagrams` - Number of partitions (t), >= 1
/// * `seed` - Seed for the partition sampler
///
/// # Returns
/// `Float32Array` of length n², row-major.
///
/// # Errors
/// Returns error on ragged or non-numeric input, or invalid `cells` / `diagrams`.
#[wasm_bindgen]
pub fn build_similarity(
    data: &JsValue,
    cells: usize,
    diagrams: usize,
    seed: u64,
) -> Result<js_sys::Float32Array, JsValue> {
    let points = js_to_points(data)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let sim = kernel::build_similarity(&points, KernelConfig::new(cells, diagrams), &mut rng)
        .map_err(to_js_error)?;
    Ok(js_sys::Float32Array::from(sim.as_slice()))
}

/// Isolation Kernel features as per-partition cell indices.
///
/// The full one-hot matrix is `n × t·ψ`; this returns the compact form.
///
/// # Returns
/// Array of `n` arrays, each holding `t` cell indices in `0..cells`.
///
/// # Errors
/// Same as [`build_similarity`].
#[wasm_bindgen]
pub fn build_features(
    data: &JsValue,
    cells: usize,
    diagrams: usize,
    seed: u64,
) -> Result<JsValue, JsValue> {
    let points = js_to_points(data)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let features = kernel::build_features(
        &points,
        KernelConfig::new(cells, diagrams).sparse(),
        &mut rng,
    )
    .map_err(to_js_error)?;

    let result = js_sys::Array::new();
    for row in 0..features.rows() {
        let inner = js_sys::Array::new();
        for cell in features.cell_assignments(row) {
            inner.push(&JsValue::from_f64(cell as f64));
        }
        result.push(&inner);
    }
    Ok(result.into())
}
