pub mod image;
mod login;
mod product;

pub use login::LoginDraft;
pub use product::{
    Field, FieldErrors, FormPhase, ImageTicket, ProductDraft, ProductForm, SubmitBlocked,
    SubmitError, SubmitRequest,
};
