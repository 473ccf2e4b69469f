//! # Campus CLI
//!
//! Database seeding utilities for Campus Records development.
//!
//! ## Usage
//!
//! ```ignore
//! use campus_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(4); // 4 departments with defaults
//! seed_all(&pool, config).await?;
//! ```

pub mod seeder;
