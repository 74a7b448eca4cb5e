use crate::models::EncodedImage;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Largest accepted upload: 5 MiB.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    #[error("Please select a valid image file (JPEG, PNG, etc.)")]
    NotAnImage,
    #[error("Image size must be less than 5MB")]
    TooLarge,
    #[error("Error processing image file")]
    Unreadable(String),
}

/// A user-selected file, readable once.
#[allow(async_fn_in_trait)]
pub trait ImageSource {
    /// Declared MIME type, e.g. `image/png`.
    fn media_type(&self) -> String;
    fn size(&self) -> u64;
    async fn read_bytes(&self) -> Result<Vec<u8>, String>;
}

pub fn check_image(media_type: &str, size: u64) -> Result<(), ImageError> {
    if !media_type.starts_with("image/") {
        return Err(ImageError::NotAnImage);
    }
    if size > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge);
    }
    Ok(())
}

/// Reads the whole file and encodes it as standard base64 (no `data:` prefix).
pub async fn encode_image<S: ImageSource>(source: &S) -> Result<EncodedImage, ImageError> {
    let bytes = source.read_bytes().await.map_err(ImageError::Unreadable)?;
    Ok(EncodedImage {
        base64: STANDARD.encode(bytes),
        media_type: source.media_type(),
    })
}

/// A `File` from an `<input type="file">`.
pub struct BrowserFile(pub web_sys::File);

impl ImageSource for BrowserFile {
    fn media_type(&self) -> String {
        self.0.type_()
    }

    fn size(&self) -> u64 {
        self.0.size() as u64
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, String> {
        let buf = wasm_bindgen_futures::JsFuture::from(self.0.array_buffer())
            .await
            .map_err(|e| format!("{e:?}"))?;
        Ok(js_sys::Uint8Array::new(&buf).to_vec())
    }
}
