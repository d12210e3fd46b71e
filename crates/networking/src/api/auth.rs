//! Login and registration with client-side field checks

use crate::PetShopClient;
use petshop_core::{Error, LoginResponse, RegisterResponse, Result};

/// Log in after checking both fields are present
pub async fn login_user(
    client: &PetShopClient,
    username: &str,
    password: &str,
) -> Result<LoginResponse> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(Error::InvalidData(
            "Enter a username and password".to_string(),
        ));
    }
    client.login(username, password).await
}

/// Register after checking every field is present
pub async fn register_user(
    client: &PetShopClient,
    username: &str,
    email: &str,
    password: &str,
) -> Result<RegisterResponse> {
    let (username, email) = (username.trim(), email.trim());
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(Error::InvalidData("All fields are required".to_string()));
    }
    client.register(username, email, password).await
}

#[cfg(test)]
mod tests {
    use super::*;

    // Validation fails before any request, so the unreachable port is never hit
    fn client() -> PetShopClient {
        PetShopClient::new("http://127.0.0.1:9").unwrap()
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let err = login_user(&client(), "  ", "secret").await.unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));

        let err = login_user(&client(), "alice", "").await.unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let err = register_user(&client(), "alice", "", "pw").await.unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }
}
