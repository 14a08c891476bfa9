use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use quiz_core::model::{Registration, User, UserRole};

use crate::backend::AuthApi;
use crate::client::ApiError;
use crate::http::HttpBackend;

//
// ─── WIRE SHAPES ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenDto {
    token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    mobile: &'a str,
    password: &'a str,
    user_type: UserRole,
}

#[derive(Debug, Serialize)]
struct OtpBody<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyOtpBody<'a> {
    email: &'a str,
    otp: &'a str,
}

#[derive(Debug, Deserialize)]
struct MeDto {
    user: UserDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    email: String,
    #[serde(default)]
    mobile: String,
    #[serde(default = "default_role")]
    user_type: UserRole,
}

fn default_role() -> UserRole {
    UserRole::Student
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        User {
            id: dto.id,
            name: dto.name,
            email: dto.email,
            mobile: dto.mobile,
            role: dto.user_type,
        }
    }
}

//
// ─── API ───────────────────────────────────────────────────────────────────────
//

#[async_trait]
impl AuthApi for HttpBackend {
    async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let dto: TokenDto = self
            .client()
            .post_json("/auth/login", &LoginBody { email, password })
            .await?;
        Ok(dto.token)
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        self.client()
            .post_unit(
                "/auth/register",
                &RegisterBody {
                    name: &registration.name,
                    email: &registration.email,
                    mobile: &registration.mobile,
                    password: &registration.password,
                    user_type: registration.role,
                },
            )
            .await
    }

    async fn send_otp(&self, email: &str) -> Result<(), ApiError> {
        self.client()
            .post_unit("/auth/send-otp", &OtpBody { email })
            .await
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), ApiError> {
        self.client()
            .post_unit("/auth/verify-otp", &VerifyOtpBody { email, otp })
            .await
    }

    async fn me(&self) -> Result<User, ApiError> {
        let dto: MeDto = self.client().get_json("/auth/me").await?;
        Ok(dto.user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn me_decodes_user_envelope() {
        let json = r#"{
            "user": {
                "_id": "u1",
                "name": "Priya",
                "email": "priya@example.com",
                "mobile": "9876543210",
                "userType": "student"
            }
        }"#;
        let dto: MeDto = serde_json::from_str(json).unwrap();
        let user = User::from(dto.user);
        assert_eq!(user.id, "u1");
        assert_eq!(user.role, UserRole::Student);
    }

    #[test]
    fn missing_user_type_defaults_to_student() {
        let json = r#"{"user": {"_id": "u1", "name": "A", "email": "a@b.c"}}"#;
        let dto: MeDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.user.user_type, UserRole::Student);
        assert_eq!(dto.user.mobile, "");
    }

    #[test]
    fn register_body_uses_user_type_key() {
        let body = RegisterBody {
            name: "Priya",
            email: "priya@example.com",
            mobile: "9876543210",
            password: "secret123",
            user_type: UserRole::Admin,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["userType"], "admin");
    }
}
