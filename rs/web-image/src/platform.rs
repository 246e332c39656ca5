//! The host facilities an [ImageDecodeAdapter](crate::ImageDecodeAdapter) calls into.
//!
//! On the web this is [Browser](crate::web::Browser), which talks to WebCodecs and the DOM.
//! Everything is expressed as a trait so the decode strategies never touch the DOM directly.

use std::future::Future;

/// The outbound boundary of the decoder.
///
/// Both decode strategies are written against this trait.
/// Errors are passed through verbatim; nothing here classifies or wraps them.
pub trait Platform {
	/// Whatever the platform throws.
	type Error: std::error::Error + 'static;

	/// A frame produced by the native decoder.
	type Frame: CodedFrame<Error = Self::Error>;

	/// A loaded image element, ready to be rasterized.
	type Image;

	/// Returns true if the platform exposes a native image decoder (WebCodecs `ImageDecoder`).
	fn supports_image_decoder(&self) -> bool;

	/// Decode the first frame of an encoded image with the native decoder.
	fn decode_frame(&self, data: &[u8], mime_type: &str) -> impl Future<Output = Result<Self::Frame, Self::Error>>;

	/// Wrap the bytes in a blob tagged with `mime_type` and return an object URL for it.
	fn create_object_url(&self, data: &[u8], mime_type: &str) -> Result<String, Self::Error>;

	/// Release an object URL previously returned by [Self::create_object_url].
	fn revoke_object_url(&self, url: &str);

	/// Load the URL into an image element, resolving on its load event.
	///
	/// The error event is the rejection reason.
	fn load_image(&self, url: &str) -> impl Future<Output = Result<Self::Image, Self::Error>>;

	/// Draw the image into a canvas of the same size and read back its RGBA pixels.
	fn rasterize(&self, image: &Self::Image) -> Result<Raster, Self::Error>;
}

/// A decoded frame owned by the platform.
pub trait CodedFrame {
	type Error;

	fn coded_width(&self) -> u32;
	fn coded_height(&self) -> u32;

	/// Copy the frame into `buffer` as packed RGBA.
	///
	/// Buffer sizing is validated by the platform, not here.
	fn copy_rgba(&self, buffer: &mut [u8]) -> impl Future<Output = Result<(), Self::Error>>;
}

/// RGBA pixels read back from a canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
	pub width: u32,
	pub height: u32,

	/// Packed RGBA, row-major, `width * height * 4` bytes.
	pub pixels: Vec<u8>,
}

/// An object URL that is revoked when dropped.
///
/// Holding the URL in a guard means it's released exactly once, whether the load succeeds, fails, or the
/// future is dropped mid-flight.
pub(crate) struct ObjectUrl<'a, P: Platform> {
	platform: &'a P,
	url: String,
}

impl<'a, P: Platform> ObjectUrl<'a, P> {
	pub fn create(platform: &'a P, data: &[u8], mime_type: &str) -> Result<Self, P::Error> {
		let url = platform.create_object_url(data, mime_type)?;
		tracing::trace!(%url, %mime_type, "created object url");

		Ok(Self { platform, url })
	}

	pub fn as_str(&self) -> &str {
		&self.url
	}
}

impl<P: Platform> Drop for ObjectUrl<'_, P> {
	fn drop(&mut self) {
		tracing::trace!(url = %self.url, "revoking object url");
		self.platform.revoke_object_url(&self.url);
	}
}
