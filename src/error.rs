/// Errors raised at the browser host boundary
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    /// A host API call rejected or threw
    #[error("host call failed: {0}")]
    Js(String),

    /// A host value did not have the expected shape
    #[error("unexpected host value: {0}")]
    Decode(String),
}

impl From<JsValue> for HostError {
    fn from(value: JsValue) -> Self {
        HostError::Js(format!("{:?}", value))
    }
}

impl From<serde_wasm_bindgen::Error> for HostError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        HostError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = HostError::Js("tab 3 not found".to_string());
        assert_eq!(err.to_string(), "host call failed: tab 3 not found");

        let err = HostError::Decode("missing field `id`".to_string());
        assert_eq!(err.to_string(), "unexpected host value: missing field `id`");
    }
}
