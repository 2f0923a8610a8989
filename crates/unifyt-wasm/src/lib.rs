use wasm_bindgen::prelude::*;

/// Convert `value` between two unit expressions. Returns the converted
/// quantity ("1 km"), or the error message.
#[wasm_bindgen]
pub fn convert(value: f64, from: &str, to: &str) -> String {
    unifyt_core::Quantity::new(value, from)
        .map_err(unifyt_core::Error::from)
        .and_then(|q| Ok(q.to(to)?))
        .map(|q| q.to_string())
        .unwrap_or_else(|e| format!("error: {e}"))
}

/// Dimension of a unit expression, e.g. "length * time^-1".
#[wasm_bindgen]
pub fn dimensionality(unit: &str) -> String {
    unifyt_core::Unit::parse(unit)
        .map(|u| u.dimensionality().to_string())
        .unwrap_or_else(|e| format!("error: {e}"))
}
