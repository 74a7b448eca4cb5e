use serde::{Deserialize, Serialize};

/// Catalog record as exchanged with the backend (`/api/products`).
///
/// `id` is assigned by the server; a record composed for creation never carries one.
/// Fetched values are displayed as-is (no re-validation of server data).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub name: String,

    // Backend sends `null` for products created without a description.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,

    pub price: f64,
    pub quantity: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Raw image bytes, standard base64 (no `data:` prefix).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,

    /// MIME type of `image_base64`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
}

impl Product {
    /// Embedded image, only when both payload and media type are present.
    pub fn image(&self) -> Option<EncodedImage> {
        let base64 = self.image_base64.as_deref().filter(|s| !s.is_empty())?;
        let media_type = self.image_type.as_deref().filter(|s| !s.is_empty())?;
        Some(EncodedImage {
            base64: base64.to_string(),
            media_type: media_type.to_string(),
        })
    }

    pub fn stock_value(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Image embedded in a product record.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub base64: String,
    pub media_type: String,
}

impl EncodedImage {
    /// `data:` URL usable as an `<img src>` preview.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.base64)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
