use crate::api::{ApiError, ApiResult, ProductRemote};
use crate::drafts::image::{check_image, encode_image, ImageError, ImageSource};
use crate::models::{EncodedImage, Product};
use crate::state::messages::{user_message, CatalogOp};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display};

/// Editable inputs of the product form. The string form is the input `name`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Name,
    Description,
    Price,
    Quantity,
    Category,
    Image,
}

pub type FieldErrors = BTreeMap<Field, String>;

/// In-progress record; numeric fields are kept as typed text until submit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
    pub category: String,
    pub image: Option<EncodedImage>,
}

impl ProductDraft {
    pub fn from_product(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            description: p.description.clone(),
            price: p.price.to_string(),
            quantity: p.quantity.to_string(),
            category: p.category.clone().unwrap_or_default(),
            image: p.image(),
        }
    }

    /// Field rules shared by create and edit.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors.insert(Field::Name, "Product name is required".to_string());
        }

        let price = self.price.trim();
        if price.is_empty() {
            errors.insert(Field::Price, "Price is required".to_string());
        } else if !matches!(price.parse::<f64>(), Ok(p) if p.is_finite() && p > 0.0) {
            errors.insert(Field::Price, "Price must be a positive number".to_string());
        }

        let quantity = self.quantity.trim();
        if quantity.is_empty() {
            errors.insert(Field::Quantity, "Quantity is required".to_string());
        } else {
            match quantity.parse::<i64>() {
                Ok(q) if q >= 0 => {}
                Ok(_) => {
                    errors.insert(
                        Field::Quantity,
                        "Quantity must be a non-negative number".to_string(),
                    );
                }
                Err(_) => {
                    errors.insert(Field::Quantity, "Quantity must be a whole number".to_string());
                }
            }
        }

        errors
    }

    /// Coerces the draft into a wire record. Call only on a draft that validated.
    fn to_product(&self, id: Option<i64>) -> Product {
        let category = self.category.trim();
        Product {
            id,
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price.trim().parse().unwrap_or_default(),
            quantity: self.quantity.trim().parse().unwrap_or_default(),
            category: (!category.is_empty()).then(|| category.to_string()),
            image_base64: self.image.as_ref().map(|i| i.base64.clone()),
            image_type: self.image.as_ref().map(|i| i.media_type.clone()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormPhase {
    /// No draft (closed, or after submit/cancel).
    #[default]
    Empty,
    Editing,
    /// Request in flight; input is ignored.
    Submitting,
    /// Validation or submission failed; the draft is preserved.
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitRequest {
    Create(Product),
    Update(i64, Product),
}

impl SubmitRequest {
    pub fn op(&self) -> CatalogOp {
        match self {
            SubmitRequest::Create(_) => CatalogOp::Create,
            SubmitRequest::Update(..) => CatalogOp::Update,
        }
    }

    /// Exactly one remote call: create without an id, update with one.
    pub async fn send<R: ProductRemote>(&self, remote: &R) -> ApiResult<Product> {
        match self {
            SubmitRequest::Create(p) => remote.create_product(p).await,
            SubmitRequest::Update(id, p) => remote.update_product(*id, p).await,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitBlocked {
    #[error("no product is being edited")]
    NotEditing,
    #[error("a save is already in progress")]
    InFlight,
    #[error("the image is still being processed")]
    ImagePending,
    #[error("the form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),
}

#[derive(Clone, Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Blocked(#[from] SubmitBlocked),
    #[error(transparent)]
    Remote(#[from] ApiError),
}

/// Orders overlapping image selections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageTicket(u64);

/// Create/edit form: draft, per-field errors, image gate and submission phase.
#[derive(Clone, Debug, Default)]
pub struct ProductForm {
    phase: FormPhase,
    id: Option<i64>,
    original: Option<Product>,
    draft: ProductDraft,
    errors: FieldErrors,
    submit_error: Option<String>,

    image_seq: u64,
    image_pending: bool,
}

impl ProductForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn is_image_pending(&self) -> bool {
        self.image_pending
    }

    fn accepts_input(&self) -> bool {
        matches!(self.phase, FormPhase::Editing | FormPhase::Error)
    }

    /// Opens the form, blank for "add" or pre-filled from a fetched record for "edit".
    pub fn initialize(&mut self, record: Option<&Product>) {
        *self = Self {
            phase: FormPhase::Editing,
            id: record.and_then(|p| p.id),
            original: record.cloned(),
            draft: record.map(ProductDraft::from_product).unwrap_or_default(),
            image_seq: self.image_seq,
            ..Self::default()
        };
    }

    pub fn field_changed(&mut self, field: Field, value: impl Into<String>) {
        if !self.accepts_input() {
            return;
        }

        let value = value.into();
        match field {
            Field::Name => self.draft.name = value,
            Field::Description => self.draft.description = value,
            Field::Price => self.draft.price = value,
            Field::Quantity => self.draft.quantity = value,
            Field::Category => self.draft.category = value,
            // Images go through begin_image/finish_image.
            Field::Image => return,
        }

        self.errors.remove(&field);
        self.submit_error = None;
        self.phase = FormPhase::Editing;
    }

    /// Validates a newly selected file. On rejection the prior image is kept and
    /// the `image` error is set; otherwise an encode is expected to follow.
    pub fn begin_image(&mut self, media_type: &str, size: u64) -> Option<ImageTicket> {
        if !self.accepts_input() {
            return None;
        }

        if let Err(e) = check_image(media_type, size) {
            self.errors.insert(Field::Image, e.to_string());
            return None;
        }

        self.image_seq = self.image_seq.saturating_add(1);
        self.image_pending = true;
        Some(ImageTicket(self.image_seq))
    }

    /// Applies an encode result. Superseded selections are dropped.
    pub fn finish_image(
        &mut self,
        ticket: ImageTicket,
        result: Result<EncodedImage, ImageError>,
    ) -> bool {
        if ticket.0 != self.image_seq || !self.image_pending {
            return false;
        }
        self.image_pending = false;

        match result {
            Ok(image) => {
                self.draft.image = Some(image);
                self.errors.remove(&Field::Image);
                true
            }
            Err(e) => {
                leptos::logging::warn!("image encode failed: {e:?}");
                self.errors.insert(Field::Image, e.to_string());
                false
            }
        }
    }

    /// Validates, encodes and attaches `source`. Returns whether the image was taken.
    pub async fn select_image<S: ImageSource>(&mut self, source: &S) -> bool {
        let Some(ticket) = self.begin_image(&source.media_type(), source.size()) else {
            return false;
        };
        let result = encode_image(source).await;
        self.finish_image(ticket, result)
    }

    pub fn remove_image(&mut self) {
        if !self.accepts_input() {
            return;
        }
        self.draft.image = None;
        self.errors.remove(&Field::Image);
        if self.image_pending {
            self.image_seq = self.image_seq.saturating_add(1);
            self.image_pending = false;
        }
    }

    pub fn validate(&self) -> FieldErrors {
        self.draft.validate()
    }

    /// Moves to `Submitting` and returns the single request to send.
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, SubmitBlocked> {
        match self.phase {
            FormPhase::Empty => return Err(SubmitBlocked::NotEditing),
            FormPhase::Submitting => return Err(SubmitBlocked::InFlight),
            FormPhase::Editing | FormPhase::Error => {}
        }

        if self.image_pending {
            return Err(SubmitBlocked::ImagePending);
        }

        let errors = self.validate();
        if !errors.is_empty() {
            self.errors = errors.clone();
            self.phase = FormPhase::Error;
            return Err(SubmitBlocked::Invalid(errors));
        }

        self.errors.clear();
        self.submit_error = None;
        self.phase = FormPhase::Submitting;

        Ok(match self.id {
            Some(id) => SubmitRequest::Update(id, self.draft.to_product(Some(id))),
            None => SubmitRequest::Create(self.draft.to_product(None)),
        })
    }

    /// Success closes the form; failure keeps the draft and records a message.
    pub fn finish_submit(
        &mut self,
        op: CatalogOp,
        result: ApiResult<Product>,
    ) -> ApiResult<Product> {
        match result {
            Ok(saved) => {
                self.cancel();
                Ok(saved)
            }
            Err(e) => {
                leptos::logging::warn!("product save failed: {e}");
                self.phase = FormPhase::Error;
                self.submit_error = Some(user_message(&e, op));
                Err(e)
            }
        }
    }

    pub async fn submit<R: ProductRemote>(&mut self, remote: &R) -> Result<Product, SubmitError> {
        let request = self.begin_submit()?;
        let result = request.send(remote).await;
        Ok(self.finish_submit(request.op(), result)?)
    }

    /// Back to the loaded record (edit) or a blank draft (add).
    pub fn reset(&mut self) {
        if self.phase == FormPhase::Submitting {
            return;
        }
        let original = self.original.take();
        self.initialize(original.as_ref());
    }

    pub fn cancel(&mut self) {
        *self = Self {
            image_seq: self.image_seq,
            ..Self::default()
        };
    }
}
