pub mod validation;

pub use validation::{FieldReader, FromJsonFields, ValidatedJson};
