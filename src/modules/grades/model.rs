pub use campus_models::grades::*;
