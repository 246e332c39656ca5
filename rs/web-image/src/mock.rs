//! A recording [Platform] for tests, decoding real images with the `image` crate.

use std::{cell::RefCell, collections::HashMap, io::Cursor, rc::Rc};

use image::{ImageFormat, RgbaImage};

use crate::{CodedFrame, Platform, Raster};

/// An outbound call made by a strategy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
	DecodeFrame { mime_type: String },
	CopyFrame,
	CreateObjectUrl { mime_type: String },
	RevokeObjectUrl(String),
	LoadImage(String),
	Rasterize,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MockError {
	#[error("unsupported mime type: {0}")]
	Unsupported(String),

	#[error("invalid image: {0}")]
	Invalid(String),

	#[error("buffer too small")]
	BufferTooSmall,

	#[error("unknown url: {0}")]
	UnknownUrl(String),
}

#[derive(Default)]
struct State {
	calls: Vec<Call>,
	blobs: HashMap<String, (Vec<u8>, String)>,
	next_url: usize,
}

#[derive(Clone, Default)]
pub struct MockPlatform {
	image_decoder: bool,
	stall_loads: bool,
	state: Rc<RefCell<State>>,
}

impl MockPlatform {
	pub fn new(image_decoder: bool) -> Self {
		Self {
			image_decoder,
			..Default::default()
		}
	}

	/// Image loads never complete, like an element whose load event never fires.
	pub fn stall_loads(mut self) -> Self {
		self.stall_loads = true;
		self
	}

	pub fn calls(&self) -> Vec<Call> {
		self.state.borrow().calls.clone()
	}

	/// The number of object URLs created but not yet revoked.
	pub fn live_urls(&self) -> usize {
		self.state.borrow().blobs.len()
	}

	fn record(&self, call: Call) {
		self.state.borrow_mut().calls.push(call);
	}
}

fn decode_image(data: &[u8], mime_type: &str) -> Result<RgbaImage, MockError> {
	let format =
		ImageFormat::from_mime_type(mime_type).ok_or_else(|| MockError::Unsupported(mime_type.to_string()))?;
	let image = image::load_from_memory_with_format(data, format).map_err(|err| MockError::Invalid(err.to_string()))?;
	Ok(image.to_rgba8())
}

pub struct MockFrame {
	image: RgbaImage,
	platform: MockPlatform,
}

impl CodedFrame for MockFrame {
	type Error = MockError;

	fn coded_width(&self) -> u32 {
		self.image.width()
	}

	fn coded_height(&self) -> u32 {
		self.image.height()
	}

	async fn copy_rgba(&self, buffer: &mut [u8]) -> Result<(), MockError> {
		self.platform.record(Call::CopyFrame);

		let pixels = self.image.as_raw();
		if buffer.len() < pixels.len() {
			return Err(MockError::BufferTooSmall);
		}

		buffer[..pixels.len()].copy_from_slice(pixels);
		Ok(())
	}
}

impl Platform for MockPlatform {
	type Error = MockError;
	type Frame = MockFrame;
	type Image = RgbaImage;

	fn supports_image_decoder(&self) -> bool {
		self.image_decoder
	}

	async fn decode_frame(&self, data: &[u8], mime_type: &str) -> Result<MockFrame, MockError> {
		self.record(Call::DecodeFrame {
			mime_type: mime_type.to_string(),
		});

		Ok(MockFrame {
			image: decode_image(data, mime_type)?,
			platform: self.clone(),
		})
	}

	fn create_object_url(&self, data: &[u8], mime_type: &str) -> Result<String, MockError> {
		self.record(Call::CreateObjectUrl {
			mime_type: mime_type.to_string(),
		});

		let mut state = self.state.borrow_mut();
		let url = format!("blob:mock/{}", state.next_url);
		state.next_url += 1;
		state.blobs.insert(url.clone(), (data.to_vec(), mime_type.to_string()));

		Ok(url)
	}

	fn revoke_object_url(&self, url: &str) {
		self.record(Call::RevokeObjectUrl(url.to_string()));
		self.state.borrow_mut().blobs.remove(url);
	}

	async fn load_image(&self, url: &str) -> Result<RgbaImage, MockError> {
		self.record(Call::LoadImage(url.to_string()));

		if self.stall_loads {
			std::future::pending::<()>().await;
		}

		let blob = self.state.borrow().blobs.get(url).cloned();
		let (data, mime_type) = blob.ok_or_else(|| MockError::UnknownUrl(url.to_string()))?;
		decode_image(&data, &mime_type)
	}

	fn rasterize(&self, image: &RgbaImage) -> Result<Raster, MockError> {
		self.record(Call::Rasterize);

		Ok(Raster {
			width: image.width(),
			height: image.height(),
			pixels: image.as_raw().clone(),
		})
	}
}

/// Encode a single-colour PNG.
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
	let image = RgbaImage::from_pixel(width, height, image::Rgba(rgba));

	let mut data = Vec::new();
	image
		.write_to(&mut Cursor::new(&mut data), ImageFormat::Png)
		.expect("failed to encode png");
	data
}
