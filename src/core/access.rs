use crate::domain::ports::RecordSource;
use crate::utils::error::{GalleryError, Result};

/// Resolves `user_id` to an admin profile id.
///
/// No id gives `Unauthorized`. An unknown id, a non-admin profile or a failed
/// lookup gives `Forbidden`.
pub async fn require_admin<R: RecordSource + ?Sized>(
    profiles: &R,
    user_id: Option<&str>,
) -> Result<String> {
    let user_id = user_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(GalleryError::Unauthorized)?;

    let profile = match profiles.fetch_admin_profile(user_id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Profile lookup for {} failed: {}", user_id, e);
            None
        }
    };

    if profile.is_some_and(|p| p.is_admin) {
        Ok(user_id.to_string())
    } else {
        Err(GalleryError::Forbidden {
            user_id: user_id.to_string(),
        })
    }
}
