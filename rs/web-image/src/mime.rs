use std::collections::HashMap;

/// The file extensions browsers can reliably decode, mapped to their MIME types.
pub fn supported_mime_types() -> HashMap<&'static str, &'static str> {
	HashMap::from([
		("jpg", "image/jpeg"),
		("jpeg", "image/jpeg"),
		("png", "image/png"),
		("gif", "image/gif"),
		("webp", "image/webp"),
		("svg", "image/svg+xml"),
		("bmp", "image/bmp"),
		("avif", "image/avif"),
	])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_jpeg_aliases() {
		let types = supported_mime_types();
		assert_eq!(types["jpg"], types["jpeg"]);
		assert_eq!(types.len(), 8);
	}
}
