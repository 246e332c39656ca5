//! Hand-written WebCodecs bindings.
//!
//! `web-sys` gates `ImageDecoder` behind `web_sys_unstable_apis`, and we only need a handful of methods.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
	/// https://developer.mozilla.org/en-US/docs/Web/API/ImageDecoder
	pub type ImageDecoder;

	#[wasm_bindgen(catch, constructor)]
	pub fn new(init: &js_sys::Object) -> Result<ImageDecoder, JsValue>;

	/// Decodes the first frame.
	#[wasm_bindgen(method)]
	pub fn decode(this: &ImageDecoder) -> js_sys::Promise;

	#[wasm_bindgen(method)]
	pub fn close(this: &ImageDecoder);

	pub type ImageDecodeResult;

	#[wasm_bindgen(method, getter)]
	pub fn image(this: &ImageDecodeResult) -> VideoFrame;

	/// https://developer.mozilla.org/en-US/docs/Web/API/VideoFrame
	pub type VideoFrame;

	#[wasm_bindgen(method, getter, js_name = codedWidth)]
	pub fn coded_width(this: &VideoFrame) -> u32;

	#[wasm_bindgen(method, getter, js_name = codedHeight)]
	pub fn coded_height(this: &VideoFrame) -> u32;

	#[wasm_bindgen(catch, method, js_name = copyTo)]
	pub fn copy_to(
		this: &VideoFrame,
		destination: &js_sys::Uint8Array,
		options: &js_sys::Object,
	) -> Result<js_sys::Promise, JsValue>;

	#[wasm_bindgen(method)]
	pub fn close(this: &VideoFrame);
}
