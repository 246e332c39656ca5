/// Errors produced while decoding or copying an image.
///
/// `E` is the platform's own error type, which is forwarded untouched.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error<E> {
	/// The platform rejected the operation.
	#[error(transparent)]
	Platform(E),

	/// `copy` was called before a successful `decode`.
	#[error("image not decoded")]
	NotDecoded,

	/// `decode` was called on an adapter that already holds an image.
	#[error("image already decoded")]
	AlreadyDecoded,

	#[error("buffer too small: needed={needed} actual={actual}")]
	BufferTooSmall { needed: usize, actual: usize },
}

impl<E> Error<E> {
	/// Returns the platform error, if that's what this is.
	pub fn platform(&self) -> Option<&E> {
		match self {
			Self::Platform(err) => Some(err),
			_ => None,
		}
	}
}
