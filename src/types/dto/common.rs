use poem_openapi::{payload::Json, ApiResponse, Object};

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}

/// Plain acknowledgement
#[derive(Object, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Body of a 201 response
#[derive(Object, Debug)]
pub struct CreatedBody {
    pub message: String,

    /// Identifier of the new row
    pub id: String,
}

#[derive(ApiResponse, Debug)]
pub enum CreatedResponse {
    #[oai(status = 201)]
    Created(Json<CreatedBody>),
}

impl CreatedResponse {
    pub fn new(message: impl Into<String>, id: String) -> Self {
        CreatedResponse::Created(Json(CreatedBody {
            message: message.into(),
            id,
        }))
    }
}
