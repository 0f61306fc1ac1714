//! Row structs and data-transfer objects for the persisted entities.
//!
//! Row structs derive `sqlx::FromRow` and map one-to-one onto the tables
//! created in [`crate::database`]. Create/update DTOs carry `validator`
//! annotations and are the only shapes accepted from clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// System user. The password is only ever persisted as a bcrypt hash; the
/// raw secret exists in memory for the duration of register/login only.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub email: String,
    pub role: String,
    pub department_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Client-facing view of a user. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserOut {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserOut {
    fn from(user: User) -> Self {
        UserOut {
            id: user.id,
            username: user.username,
            name: user.name,
            email: user.email,
            role: user.role,
            department_name: user.department_name,
            created_at: user.created_at,
        }
    }
}

/// Internal user-creation DTO, built by the auth service after hashing.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub email: String,
    pub role: String,
    pub department_name: Option<String>,
}

/// Partial user update. Absent fields are left untouched; a present
/// `password` is re-hashed before it reaches the repository.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: Option<String>,
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub department_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ConsultingManager {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateConsultingManager {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Department name is required"))]
    pub department_name: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProjectExperience {
    pub id: i64,
    pub no_sales_order: String,
    pub customer_name: String,
    pub project_name: String,
    pub project_year: String,
    pub category: String,
    pub consulting_manager_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectExperience {
    #[validate(length(min = 1, message = "Sales order number is required"))]
    pub no_sales_order: String,
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(length(min = 1, message = "Project name is required"))]
    pub project_name: String,
    #[validate(length(equal = 4, message = "Project year must be four digits"))]
    pub project_year: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    pub consulting_manager_id: Option<i64>,
}

/// Partial project-experience update. `consulting_manager_id` is checked
/// against the managers table before it is applied.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectExperience {
    pub no_sales_order: Option<String>,
    pub customer_name: Option<String>,
    pub project_name: Option<String>,
    #[validate(length(equal = 4, message = "Project year must be four digits"))]
    pub project_year: Option<String>,
    pub category: Option<String>,
    pub consulting_manager_id: Option<i64>,
}
