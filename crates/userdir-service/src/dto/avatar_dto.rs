//! Avatar upload DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use userdir_core::UserId;

/// Upload body: the PNG image, base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadAvatarRequest {
    pub image_data: String,
}

/// Query string of the upload route.
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadAvatarQuery {
    /// Owner of the avatar.
    pub id: UserId,
}

/// Storage key of the uploaded avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadAvatarResponse {
    pub file_path: String,
}
