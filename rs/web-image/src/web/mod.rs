//! The browser [Platform]: WebCodecs when available, the DOM otherwise.

mod bindings;

use std::fmt;

use js_sys::{Array, Object, Promise, Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Url};

use crate::{CodedFrame, Platform, Raster};

/// Whatever JavaScript threw or rejected with, untouched.
#[derive(Clone, Debug)]
pub struct Exception(JsValue);

impl Exception {
	fn message(message: &str) -> Self {
		Self(js_sys::Error::new(message).into())
	}

	pub fn into_inner(self) -> JsValue {
		self.0
	}
}

impl From<JsValue> for Exception {
	fn from(value: JsValue) -> Self {
		Self(value)
	}
}

impl fmt::Display for Exception {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let Some(err) = self.0.dyn_ref::<js_sys::Error>() {
			return write!(f, "{}", String::from(err.message()));
		}

		// An image element rejects with its error event, which has no message.
		if let Some(event) = self.0.dyn_ref::<web_sys::Event>() {
			return write!(f, "{} event", event.type_());
		}

		match self.0.as_string() {
			Some(message) => write!(f, "{message}"),
			None => write!(f, "{:?}", self.0),
		}
	}
}

impl std::error::Error for Exception {}

/// A frame decoded by WebCodecs, closed when dropped.
pub struct Frame(bindings::VideoFrame);

impl CodedFrame for Frame {
	type Error = Exception;

	fn coded_width(&self) -> u32 {
		self.0.coded_width()
	}

	fn coded_height(&self) -> u32 {
		self.0.coded_height()
	}

	async fn copy_rgba(&self, buffer: &mut [u8]) -> Result<(), Exception> {
		let length = u32::try_from(buffer.len()).map_err(|_| Exception::message("buffer too large"))?;

		// The copy is async, so it can't target wasm memory directly.
		let destination = Uint8Array::new_with_length(length);

		let options = Object::new();
		Reflect::set(&options, &"format".into(), &"RGBA".into())?;

		JsFuture::from(self.0.copy_to(&destination, &options)?).await?;
		destination.copy_to(buffer);

		Ok(())
	}
}

impl Drop for Frame {
	fn drop(&mut self) {
		self.0.close();
	}
}

fn document() -> Result<web_sys::Document, Exception> {
	web_sys::window()
		.and_then(|window| window.document())
		.ok_or_else(|| Exception::message("no document"))
}

/// The browser, accessed through the global scope.
#[derive(Clone, Copy, Debug, Default)]
pub struct Browser;

impl Browser {
	pub fn new() -> Self {
		Self
	}
}

impl Platform for Browser {
	type Error = Exception;
	type Frame = Frame;
	type Image = HtmlImageElement;

	fn supports_image_decoder(&self) -> bool {
		Reflect::has(&js_sys::global(), &"ImageDecoder".into()).unwrap_or(false)
	}

	async fn decode_frame(&self, data: &[u8], mime_type: &str) -> Result<Frame, Exception> {
		let init = Object::new();
		Reflect::set(&init, &"type".into(), &mime_type.into())?;
		Reflect::set(&init, &"data".into(), &Uint8Array::from(data))?;

		let decoder = bindings::ImageDecoder::new(&init)?;
		let result = JsFuture::from(decoder.decode()).await;

		// The frame outlives the decoder.
		decoder.close();

		let result: bindings::ImageDecodeResult = result?.unchecked_into();
		Ok(Frame(result.image()))
	}

	fn create_object_url(&self, data: &[u8], mime_type: &str) -> Result<String, Exception> {
		let parts = Array::of1(&Uint8Array::from(data));

		let options = BlobPropertyBag::new();
		options.set_type(mime_type);

		let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
		Ok(Url::create_object_url_with_blob(&blob)?)
	}

	fn revoke_object_url(&self, url: &str) {
		if let Err(err) = Url::revoke_object_url(url) {
			tracing::warn!(err = %Exception::from(err), %url, "failed to revoke object url");
		}
	}

	async fn load_image(&self, url: &str) -> Result<HtmlImageElement, Exception> {
		let image = HtmlImageElement::new()?;

		// Resolves with the load event, rejects with the error event.
		let loaded = Promise::new(&mut |resolve, reject| {
			image.set_onload(Some(&resolve));
			image.set_onerror(Some(&reject));
		});

		image.set_src(url);
		let result = JsFuture::from(loaded).await;

		image.set_onload(None);
		image.set_onerror(None);

		result?;
		tracing::trace!(%url, width = image.natural_width(), height = image.natural_height(), "image loaded");

		Ok(image)
	}

	fn rasterize(&self, image: &HtmlImageElement) -> Result<Raster, Exception> {
		let width = image.natural_width();
		let height = image.natural_height();

		let canvas: HtmlCanvasElement = document()?
			.create_element("canvas")?
			.dyn_into()
			.map_err(JsValue::from)?;
		canvas.set_width(width);
		canvas.set_height(height);

		let context: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or_else(|| Exception::message("2d context unavailable"))?
			.dyn_into()
			.map_err(JsValue::from)?;

		context.draw_image_with_html_image_element(image, 0.0, 0.0)?;
		let data = context.get_image_data(0.0, 0.0, width as f64, height as f64)?;

		Ok(Raster {
			width,
			height,
			pixels: data.data().0,
		})
	}
}
