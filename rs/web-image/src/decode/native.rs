use super::{Decoded, Strategy};
use crate::Platform;

/// Decodes with the platform's native decoder (WebCodecs `ImageDecoder`).
///
/// The frame is kept around and copied out on demand, so no pixels are read until [Decoded::copy].
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageDecoderStrategy;

impl<P: Platform> Strategy<P> for ImageDecoderStrategy {
	async fn decode(&self, platform: &P, data: &[u8], mime_type: &str) -> Result<Decoded<P>, P::Error> {
		let frame = platform.decode_frame(data, mime_type).await?;
		Ok(Decoded::Frame(frame))
	}
}
