//! Value objects - Immutable, self-validating objects defined by their attributes

mod content;
mod description;
mod ids;
mod name;
mod title;
mod user_id;
mod validation;

pub use content::Content;
pub use description::Description;
pub use ids::*;
pub use name::Name;
pub use title::Title;
pub use user_id::UserId;
pub use validation::{FieldError, ValidationError, CODE_EMPTY, CODE_MALFORMED, CODE_TOO_LONG};
