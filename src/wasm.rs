//! WASM bindings for in-browser conversion.
//!
//! Block trees cross the boundary as JSON strings in the same shape
//! `serde_json` produces for [`BlockNode`].

use wasm_bindgen::prelude::*;

use crate::block::BlockNode;
use crate::config::MarkupOptions;
use crate::{blocks_to_html, html_to_blocks, parse_markup, serialize_blocks_to_markup};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_blocks(json: &str) -> Result<Vec<BlockNode>, JsValue> {
    serde_json::from_str(json).map_err(to_js)
}

/// Convert an HTML fragment to a JSON array of blocks.
#[wasm_bindgen]
pub fn html_to_blocks_json(html: &str) -> Result<String, JsValue> {
    serde_json::to_string(&html_to_blocks(html)).map_err(to_js)
}

/// Render a JSON array of blocks back to HTML.
#[wasm_bindgen]
pub fn blocks_json_to_html(json: &str) -> Result<String, JsValue> {
    let blocks = parse_blocks(json)?;
    blocks_to_html(&blocks).map_err(to_js)
}

/// Serialize a JSON array of blocks to comment-delimited block markup.
#[wasm_bindgen]
pub fn blocks_json_to_markup(json: &str, double_escape: bool) -> Result<String, JsValue> {
    let blocks = parse_blocks(json)?;
    serialize_blocks_to_markup(&blocks, MarkupOptions { double_escape }).map_err(to_js)
}

/// Parse block markup into a JSON array of blocks.
#[wasm_bindgen]
pub fn markup_to_blocks_json(markup: &str, double_escape: bool) -> Result<String, JsValue> {
    let blocks = parse_markup(markup, MarkupOptions { double_escape }).map_err(to_js)?;
    serde_json::to_string(&blocks).map_err(to_js)
}
