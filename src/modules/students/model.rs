pub use campus_models::students::*;
