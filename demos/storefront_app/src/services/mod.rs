// demos/storefront_app/src/services/mod.rs

//! Local stand-ins for the storefront's remote services.

pub mod cart_mock;
