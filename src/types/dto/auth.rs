use poem_openapi::Object;

/// Request model for self-service registration
#[derive(Object, Debug, Default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,

    /// `petugas` when omitted
    pub role: Option<String>,
}

/// Request model for login
#[derive(Object, Debug, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response model for a successful login
#[derive(Object, Debug)]
pub struct TokenResponse {
    /// Always `success`
    pub status: String,

    /// HS256 bearer token
    pub token: String,
}

/// Current caller as stored
#[derive(Object, Debug)]
pub struct MeResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}
