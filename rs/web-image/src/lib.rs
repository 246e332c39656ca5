//! # web-image: image decoding in the browser
//!
//! Decodes images with the WebCodecs `ImageDecoder` when the browser has one,
//! falling back to an image element and a canvas when it doesn't.
//! Either way you get the same thing: dimensions and RGBA pixels.
//!
//! ## API
//!
//! - [ImageDecodeAdapter]: decodes a single image via a [Method] chosen once at construction.
//! - [ImageLoader]: resolves MIME types from file extensions and produces [image::RgbaImage]s.
//! - [Platform]: the host facilities the decoders call; [web::Browser] on `wasm32`.
//!
//! ```ignore
//! use web_image::{ImageDecodeAdapter, web::Browser};
//!
//! let mut adapter = ImageDecodeAdapter::new(Browser::new());
//! adapter.decode(&bytes, "image/png").await?;
//!
//! let mut buffer = vec![0; adapter.width() as usize * adapter.height() as usize * 4];
//! adapter.copy(&mut buffer).await?;
//! ```

mod decode;
mod error;
mod loader;
mod platform;

pub mod mime;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod mock;

pub use decode::*;
pub use error::*;
pub use loader::*;
pub use platform::*;

// export the image version in use
pub use image;
