pub use campus_models::identifiers::*;
