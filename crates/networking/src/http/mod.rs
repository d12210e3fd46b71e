//! HTTP client for the storefront API

mod client;

pub use client::PetShopClient;
