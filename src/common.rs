pub mod error;
pub mod month_key;
pub mod numeric;
