//! Catalog operations

use crate::PetShopClient;
use petshop_core::{Product, Result};

/// Fetch products, `None` or `"all"` for the whole catalog
pub async fn fetch_products(client: &PetShopClient, category: Option<&str>) -> Result<Vec<Product>> {
    client.get_products(category).await
}
