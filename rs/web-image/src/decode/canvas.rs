//! Fallback decoding through an image element and a 2D canvas.

use std::future::{Ready, ready};

use super::{Decoded, Strategy};
use crate::platform::ObjectUrl;
use crate::{Error, Platform, Raster};

/// Loads the bytes as a blob URL into an image element, then rasterizes it.
///
/// Works in any browser, at the cost of a round trip through the DOM and a premultiplied canvas.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanvasStrategy;

impl<P: Platform> Strategy<P> for CanvasStrategy {
	async fn decode(&self, platform: &P, data: &[u8], mime_type: &str) -> Result<Decoded<P>, P::Error> {
		let url = ObjectUrl::create(platform, data, mime_type)?;
		let image = platform.load_image(url.as_str()).await?;

		// The URL is only needed until the load event.
		drop(url);

		let raster = platform.rasterize(&image)?;
		Ok(Decoded::Raster(raster))
	}
}

/// Copy pixels that were already read back, completing immediately.
///
/// A longer buffer only has its prefix written.
pub(super) fn copy_pixels<E>(raster: &Raster, buffer: &mut [u8]) -> Ready<Result<(), Error<E>>> {
	let needed = raster.pixels.len();
	let actual = buffer.len();
	if actual < needed {
		return ready(Err(Error::BufferTooSmall { needed, actual }));
	}

	buffer[..needed].copy_from_slice(&raster.pixels);
	ready(Ok(()))
}
