use crate::{
    db::CatalogStore,
    error::{AppError, AppResult},
    models::{Credentials, LoginResponse},
    services::providers::IdentityProvider,
};

pub const USER_REGISTERED_MESSAGE: &str = "User registered successfully!";

fn require_credentials(credentials: &Credentials) -> AppResult<()> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Email and password are required.".to_string(),
        ));
    }
    Ok(())
}

/// Signs the user up with the identity provider and creates their profile
pub async fn register(
    identity: &dyn IdentityProvider,
    store: &dyn CatalogStore,
    credentials: &Credentials,
) -> AppResult<()> {
    require_credentials(credentials)?;

    let user_id = identity
        .sign_up(&credentials.email, &credentials.password)
        .await?;
    let profile = store.insert_profile(&user_id).await?;

    tracing::info!(user_id = %profile.id, "User registered");

    Ok(())
}

/// Exchanges credentials for an access token plus the user's profile
pub async fn login(
    identity: &dyn IdentityProvider,
    store: &dyn CatalogStore,
    credentials: &Credentials,
) -> AppResult<LoginResponse> {
    require_credentials(credentials)?;

    let session = identity
        .sign_in(&credentials.email, &credentials.password)
        .await?;

    let profile = store
        .find_profile(&session.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User profile not found.".to_string()))?;

    tracing::info!(user_id = %profile.id, "User logged in");

    Ok(LoginResponse {
        access_token: session.access_token,
        user: profile,
    })
}
