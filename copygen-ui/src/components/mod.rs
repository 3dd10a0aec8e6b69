mod copy_form;

pub use copy_form::{CopyForm, FormField};
