//! Image decoding with WebCodecs, falling back to a canvas.
//!
//! # Architecture
//!
//! An [ImageDecodeAdapter] probes the [Platform] once, when constructed, and picks a [Method]:
//! 1. [Method::ImageDecoder] hands the bytes to the native decoder and keeps the resulting frame.
//! 2. [Method::Canvas] loads the bytes into an image element and reads the pixels back through a canvas.
//!
//! Either way the caller sees the same thing: a width, a height, and an async copy into an RGBA buffer.

mod canvas;
mod native;

pub use canvas::CanvasStrategy;
pub use native::ImageDecoderStrategy;

use std::future::Future;

use crate::{CodedFrame, Error, Platform, Raster};

/// How an adapter decodes images, fixed for its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// WebCodecs `ImageDecoder`.
	ImageDecoder,
	/// An image element rasterized into a canvas.
	Canvas,
}

impl Method {
	/// Pick the best method the platform supports.
	pub fn detect<P: Platform>(platform: &P) -> Self {
		match platform.supports_image_decoder() {
			true => Self::ImageDecoder,
			false => Self::Canvas,
		}
	}
}

/// A way of turning encoded bytes into a [Decoded] image.
pub trait Strategy<P: Platform> {
	fn decode(&self, platform: &P, data: &[u8], mime_type: &str) -> impl Future<Output = Result<Decoded<P>, P::Error>>;
}

impl<P: Platform> Strategy<P> for Method {
	async fn decode(&self, platform: &P, data: &[u8], mime_type: &str) -> Result<Decoded<P>, P::Error> {
		match self {
			Self::ImageDecoder => ImageDecoderStrategy.decode(platform, data, mime_type).await,
			Self::Canvas => CanvasStrategy.decode(platform, data, mime_type).await,
		}
	}
}

/// The output of a [Strategy], shaped by whichever one produced it.
pub enum Decoded<P: Platform> {
	/// A frame still owned by the platform.
	Frame(P::Frame),
	/// Pixels already read back into memory.
	Raster(Raster),
}

impl<P: Platform> Decoded<P> {
	pub fn width(&self) -> u32 {
		match self {
			Self::Frame(frame) => frame.coded_width(),
			Self::Raster(raster) => raster.width,
		}
	}

	pub fn height(&self) -> u32 {
		match self {
			Self::Frame(frame) => frame.coded_height(),
			Self::Raster(raster) => raster.height,
		}
	}

	/// Copy the decoded pixels into `buffer` as packed RGBA.
	pub async fn copy(&self, buffer: &mut [u8]) -> Result<(), Error<P::Error>> {
		match self {
			Self::Frame(frame) => frame.copy_rgba(buffer).await.map_err(Error::Platform),
			Self::Raster(raster) => canvas::copy_pixels(raster, buffer).await,
		}
	}
}

/// Decodes a single image and copies its pixels out on request.
///
/// Construct one per image: [Self::decode] once, then [Self::copy] as many times as needed.
/// The width and height are zero until the decode succeeds.
pub struct ImageDecodeAdapter<P: Platform> {
	platform: P,
	method: Method,

	width: u32,
	height: u32,

	decoded: Option<Decoded<P>>,
}

impl<P: Platform> ImageDecodeAdapter<P> {
	/// Create an adapter, probing the platform for native decoder support.
	pub fn new(platform: P) -> Self {
		let method = Method::detect(&platform);
		Self::with_method(platform, method)
	}

	/// Create an adapter that always uses the given method.
	pub fn with_method(platform: P, method: Method) -> Self {
		Self {
			platform,
			method,
			width: 0,
			height: 0,
			decoded: None,
		}
	}

	pub fn method(&self) -> Method {
		self.method
	}

	pub fn using_image_decoder(&self) -> bool {
		self.method == Method::ImageDecoder
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	pub fn is_decoded(&self) -> bool {
		self.decoded.is_some()
	}

	pub fn platform(&self) -> &P {
		&self.platform
	}

	/// Decode an encoded image.
	///
	/// Platform errors are returned as-is via [Error::Platform], leaving the adapter undecoded.
	pub async fn decode(&mut self, data: &[u8], mime_type: &str) -> Result<(), Error<P::Error>> {
		if self.decoded.is_some() {
			return Err(Error::AlreadyDecoded);
		}

		tracing::debug!(%mime_type, method = ?self.method, size = data.len(), "decoding image");

		let decoded = self
			.method
			.decode(&self.platform, data, mime_type)
			.await
			.inspect_err(|err| tracing::debug!(%err, %mime_type, "failed to decode image"))
			.map_err(Error::Platform)?;

		self.width = decoded.width();
		self.height = decoded.height();
		self.decoded = Some(decoded);

		tracing::debug!(width = self.width, height = self.height, "decoded image");

		Ok(())
	}

	/// Copy the decoded pixels into `buffer` as packed RGBA.
	///
	/// The buffer should be `width * height * 4` bytes.
	/// Fails with [Error::NotDecoded] if [Self::decode] hasn't succeeded yet.
	pub async fn copy(&self, buffer: &mut [u8]) -> Result<(), Error<P::Error>> {
		let decoded = self.decoded.as_ref().ok_or(Error::<P::Error>::NotDecoded)?;
		decoded.copy(buffer).await
	}
}
