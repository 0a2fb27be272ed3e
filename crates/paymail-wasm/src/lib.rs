//! WASM bindings for payment email extraction.
//!
//! Exposes the heuristic extractor, LLM reply interpretation and the
//! precedence rule to browsers and Node.js. The LLM call itself is left
//! to the host.

use std::fmt::Display;

use wasm_bindgen::prelude::*;

use paymail_core::extraction::llm::parse_llm_reply;
use paymail_core::extraction::resolve::DEFAULT_PREFERENCE_THRESHOLD;
use paymail_core::{
    extract_payment_details, resolve_payment, ParseEmailRequest, ParseEmailResponse,
    ParsedPayment,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn js_error(e: impl Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(js_error)
}

fn optional_payment(value: JsValue) -> Result<Option<ParsedPayment>, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value).map_err(js_error)
}

/// Extract payment details from raw email text with the heuristic rules.
#[wasm_bindgen(js_name = extractPaymentDetails)]
pub fn extract_payment_details_js(text: &str) -> Result<JsValue, JsValue> {
    to_js(&extract_payment_details(text))
}

/// Pick between an LLM result (or `null`) and the heuristic one.
///
/// Returns `{ payment, source }` where `source` is `"heuristic"` or
/// `"probabilistic"`.
#[wasm_bindgen(js_name = resolvePayment)]
pub fn resolve_payment_js(
    text: &str,
    llm_result: JsValue,
    threshold: Option<f64>,
) -> Result<JsValue, JsValue> {
    let llm_result = optional_payment(llm_result)?;
    let resolved = resolve_payment(
        llm_result,
        text,
        threshold.unwrap_or(DEFAULT_PREFERENCE_THRESHOLD),
    );
    to_js(&resolved)
}

/// Interpret the message content of an LLM reply.
#[wasm_bindgen(js_name = parseLlmReply)]
pub fn parse_llm_reply_js(content: &str) -> Result<JsValue, JsValue> {
    let payment = parse_llm_reply(content).map_err(js_error)?;
    to_js(&payment)
}

/// Handle a `{ emailText, userId }` request, returning `{ ok, data, userId }`.
#[wasm_bindgen(js_name = parseEmail)]
pub fn parse_email(request: JsValue) -> Result<JsValue, JsValue> {
    let request: ParseEmailRequest = serde_wasm_bindgen::from_value(request).map_err(js_error)?;
    let data = extract_payment_details(&request.email_text);
    to_js(&ParseEmailResponse::new(data, request.user_id))
}

/// Email parser class for browser use.
#[wasm_bindgen]
pub struct EmailParser {
    preference_threshold: f64,
}

#[wasm_bindgen]
impl EmailParser {
    /// Create a parser with the default preference threshold.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            preference_threshold: DEFAULT_PREFERENCE_THRESHOLD,
        }
    }

    /// Confidence at which an LLM result is used without comparison.
    #[wasm_bindgen(getter, js_name = preferenceThreshold)]
    pub fn preference_threshold(&self) -> f64 {
        self.preference_threshold
    }

    #[wasm_bindgen(js_name = setPreferenceThreshold)]
    pub fn set_preference_threshold(&mut self, threshold: f64) -> Result<(), JsValue> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(js_error(format!(
                "preference threshold must be within 0..=1, got {}",
                threshold
            )));
        }
        self.preference_threshold = threshold;
        Ok(())
    }

    /// Heuristic extraction.
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        extract_payment_details_js(text)
    }

    /// Resolve against an optional LLM result.
    pub fn resolve(&self, text: &str, llm_result: JsValue) -> Result<JsValue, JsValue> {
        resolve_payment_js(text, llm_result, Some(self.preference_threshold))
    }
}

impl Default for EmailParser {
    fn default() -> Self {
        Self::new()
    }
}
