//! Shared test support utilities for behaviour-driven suites.
//!
//! Builds signed manifest containers with a fixed test key so scenarios can
//! describe the manifest they want and get back container bytes.
pub mod containers;
