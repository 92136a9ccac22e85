use poem_openapi::Object;

use crate::types::internal::auth::User;
use crate::types::list_query::Page;

#[derive(Object, Debug, Default)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Object, Debug, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Object, Debug, Default)]
pub struct ChangePasswordRequest {
    #[oai(rename = "currentPassword")]
    pub current_password: Option<String>,

    #[oai(rename = "newPassword")]
    pub new_password: Option<String>,
}

/// A user without its password hash
#[derive(Object, Debug)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    #[oai(rename = "createdAt")]
    pub created_at: String,
    pub role: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            role: user.role.to_string(),
        }
    }
}

#[derive(Object, Debug)]
pub struct UserListResponse {
    pub data: Vec<UserSummary>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    #[oai(rename = "totalPages")]
    pub total_pages: u64,
}

impl From<Page<User>> for UserListResponse {
    fn from(page: Page<User>) -> Self {
        Self {
            total: page.total as u64,
            page: page.page as u64,
            limit: page.limit as u64,
            total_pages: page.total_pages as u64,
            data: page.items.into_iter().map(UserSummary::from).collect(),
        }
    }
}
