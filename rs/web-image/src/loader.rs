//! Loading image files into RGBA buffers.
//!
//! This is the caller of [ImageDecodeAdapter]: it figures out the MIME type, decodes, allocates
//! a buffer of the right size, and copies the pixels out.

use std::{collections::HashMap, path::Path};

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{Error, ImageDecodeAdapter, Method, Platform, mime};

/// How to pick the MIME type for a load.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FormatSetting {
	/// Look up the file extension in the loader's table.
	#[default]
	FromExtension,
	/// Use this MIME type regardless of the path.
	MimeType(String),
}

/// Per-load settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderSettings {
	pub format: FormatSetting,
}

/// Configuration for an [ImageLoader].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct LoaderConfig {
	/// File extensions mapped to MIME types.
	///
	/// Providing this replaces the default table entirely.
	pub mime_types: HashMap<String, String>,

	/// Always decode with a canvas, even if WebCodecs is available.
	pub force_canvas: bool,
}

impl Default for LoaderConfig {
	fn default() -> Self {
		let mime_types = mime::supported_mime_types()
			.into_iter()
			.map(|(ext, mime)| (ext.to_string(), mime.to_string()))
			.collect();

		Self {
			mime_types,
			force_canvas: false,
		}
	}
}

impl LoaderConfig {
	pub fn init<P: Platform + Clone>(self, platform: P) -> ImageLoader<P> {
		ImageLoader::new(platform, self)
	}
}

/// Errors produced by an [ImageLoader].
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum LoadError<E> {
	#[error("failed to read {path}: {source}")]
	Io { path: String, source: std::io::Error },

	#[error("missing file extension: {path}")]
	MissingExtension { path: String },

	#[error("unsupported extension {extension:?}: {path}")]
	UnsupportedExtension { path: String, extension: String },

	#[error("image too large: {path} ({width}x{height})")]
	TooLarge { path: String, width: u32, height: u32 },

	#[error("failed to decode {path}: {source}")]
	Decode { path: String, source: Error<E> },
}

/// Decodes image files into [RgbaImage]s using the platform's decoders.
pub struct ImageLoader<P> {
	platform: P,
	mime_types: HashMap<String, String>,
	extensions: Vec<String>,
	force_canvas: bool,
}

impl<P: Platform + Clone> ImageLoader<P> {
	pub fn new(platform: P, config: LoaderConfig) -> Self {
		if config.force_canvas {
			tracing::debug!("canvas decoding forced");
		} else if !platform.supports_image_decoder() {
			tracing::warn!("ImageDecoder is not supported, falling back to canvas decoding");
		}

		let mime_types: HashMap<String, String> = config
			.mime_types
			.into_iter()
			.map(|(ext, mime)| (ext.to_ascii_lowercase(), mime))
			.collect();

		let mut extensions: Vec<String> = mime_types.keys().cloned().collect();
		extensions.sort();

		Self {
			platform,
			mime_types,
			extensions,
			force_canvas: config.force_canvas,
		}
	}

	/// The file extensions this loader accepts, sorted.
	pub fn extensions(&self) -> &[String] {
		&self.extensions
	}

	pub fn supports_image_decoder(&self) -> bool {
		self.platform.supports_image_decoder()
	}

	/// Resolve the MIME type for a path, honoring any override in the settings.
	pub fn mime_type<'a>(&'a self, path: &Path, settings: &'a LoaderSettings) -> Result<&'a str, LoadError<P::Error>> {
		if let FormatSetting::MimeType(mime_type) = &settings.format {
			return Ok(mime_type.as_str());
		}

		let extension = path
			.extension()
			.and_then(|ext| ext.to_str())
			.ok_or_else(|| LoadError::<P::Error>::MissingExtension {
				path: path.display().to_string(),
			})?;

		match self.mime_types.get(&extension.to_ascii_lowercase()) {
			Some(mime_type) => Ok(mime_type.as_str()),
			None => Err(LoadError::UnsupportedExtension {
				path: path.display().to_string(),
				extension: extension.to_string(),
			}),
		}
	}

	/// A fresh adapter for a single image.
	pub fn adapter(&self) -> ImageDecodeAdapter<P> {
		let platform = self.platform.clone();
		match self.force_canvas {
			true => ImageDecodeAdapter::with_method(platform, Method::Canvas),
			false => ImageDecodeAdapter::new(platform),
		}
	}

	/// Decode an encoded image into RGBA pixels.
	pub async fn load(
		&self,
		bytes: &[u8],
		path: &Path,
		settings: &LoaderSettings,
	) -> Result<RgbaImage, LoadError<P::Error>> {
		let mime_type = self.mime_type(path, settings)?;
		tracing::debug!(path = %path.display(), %mime_type, "loading image");

		let decode_error = |source| LoadError::Decode {
			path: path.display().to_string(),
			source,
		};

		let mut adapter = self.adapter();
		adapter.decode(bytes, mime_type).await.map_err(decode_error)?;

		let (width, height) = (adapter.width(), adapter.height());
		let too_large = || LoadError::<P::Error>::TooLarge {
			path: path.display().to_string(),
			width,
			height,
		};

		let size = (width as usize)
			.checked_mul(height as usize)
			.and_then(|pixels| pixels.checked_mul(4))
			.ok_or_else(too_large)?;

		let mut buffer = vec![0; size];
		adapter.copy(&mut buffer).await.map_err(decode_error)?;

		RgbaImage::from_raw(width, height, buffer).ok_or_else(too_large)
	}

	/// Read everything from `reader`, then [Self::load] it.
	pub async fn load_from<R: AsyncRead + Unpin>(
		&self,
		reader: &mut R,
		path: &Path,
		settings: &LoaderSettings,
	) -> Result<RgbaImage, LoadError<P::Error>> {
		let mut bytes = Vec::new();
		reader
			.read_to_end(&mut bytes)
			.await
			.map_err(|source| LoadError::<P::Error>::Io {
				path: path.display().to_string(),
				source,
			})?;

		self.load(&bytes, path, settings).await
	}
}
