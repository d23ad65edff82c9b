mod input;

pub use input::{FormInput, InputView, MASK_CHAR};
