//! PetShop HTTP client for the catalog and auth endpoints

use petshop_core::{
    Error, ErrorBody, LoginRequest, LoginResponse, Product, RegisterRequest, RegisterResponse,
    Result,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, Response, StatusCode,
};
use tracing::{debug, error, instrument};

const USER_AGENT_VALUE: &str = concat!("petshop-client/", env!("CARGO_PKG_VERSION"));

/// Pseudo-category meaning "no filter"
const ALL_CATEGORIES: &str = "all";

/// HTTP client for the storefront API
///
/// Stateless apart from the base URL; the access token returned by
/// `login` is handed back to the caller, never kept here.
pub struct PetShopClient {
    http: Client,
    base_url: String,
}

impl PetShopClient {
    /// Create a new client for the given origin (e.g. `http://127.0.0.1:8000`)
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .default_headers(Self::default_headers())
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-2xx response into an error carrying the server's `detail`
    async fn error_from_response(response: Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message())
            .unwrap_or(body);

        error!("Request failed: HTTP {} {}", status, detail);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::AuthenticationError(detail),
            _ => Error::ApiError(format!("HTTP {}: {}", status.as_u16(), detail)),
        }
    }

    /// Fetch the catalog, optionally narrowed to one category
    ///
    /// `Some("all")` behaves like `None`.
    #[instrument(skip(self))]
    pub async fn get_products(&self, category: Option<&str>) -> Result<Vec<Product>> {
        let mut request = self.http.get(self.url("/products"));
        if let Some(category) = category_filter(category) {
            request = request.query(&[("category", category)]);
        }

        let response = request.send().await?;
        debug!("Products response status: {}", response.status());

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let products: Vec<Product> = response.json().await.map_err(|e| {
            error!("Failed to parse products response: {}", e);
            Error::InvalidData(e.to_string())
        })?;

        debug!("Fetched {} products", products.len());
        Ok(products)
    }

    /// Log in; the returned `username` is filled from the request when the
    /// server leaves it out
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self.http.post(self.url("/login")).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(match Self::error_from_response(response).await {
                Error::ApiError(detail) => Error::AuthenticationError(detail),
                other => other,
            });
        }

        let mut login: LoginResponse = response.json().await.map_err(|e| {
            error!("Failed to parse login response: {}", e);
            Error::InvalidData(e.to_string())
        })?;

        if login.username.as_deref().map_or(true, str::is_empty) {
            login.username = Some(username.to_string());
        }

        debug!("Logged in as {:?}", login.username);
        Ok(login)
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse> {
        let body = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self.http.post(self.url("/register")).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        // Body shape is informational only
        let text = response.text().await.unwrap_or_default();
        let registered = serde_json::from_str(&text).unwrap_or_default();

        debug!("Registered user {}", username);
        Ok(registered)
    }
}

/// Category to send as `?category=`, if any
fn category_filter(category: Option<&str>) -> Option<&str> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter() {
        assert_eq!(category_filter(None), None);
        assert_eq!(category_filter(Some("all")), None);
        assert_eq!(category_filter(Some("  ")), None);
        assert_eq!(category_filter(Some("toys")), Some("toys"));
    }

    #[test]
    fn test_base_url_normalized() {
        let client = PetShopClient::new("http://127.0.0.1:8000/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
        assert_eq!(client.url("/products"), "http://127.0.0.1:8000/products");
    }
}
