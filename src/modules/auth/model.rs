pub use campus_models::auth::*;
