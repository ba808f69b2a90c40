//! Request payloads and their validation.
//!
//! Every field defaults, so a missing envelope or field reaches validation
//! as an empty value and surfaces as `{key: required}` instead of a parse
//! failure.

use conduit_core::errors::ValidationError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;
use crate::validation::{
    check_field, check_optional, BIO_RULES, COMMENT_RULES, EMAIL_RULES, IMAGE_RULES,
    PASSWORD_RULES, TEXT_RULES, TITLE_RULES, USERNAME_RULES,
};

/// Decode a JSON body. Syntax and type errors are a 400.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedPayload(e.to_string()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterPayload {
    pub user: RegisterUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: String,
    pub image: Option<String>,
}

impl RegisterUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        check_field(&mut errors, "Username", &self.username, USERNAME_RULES);
        check_field(&mut errors, "Email", &self.email, EMAIL_RULES);
        check_field(&mut errors, "Password", &self.password, PASSWORD_RULES);
        check_field(&mut errors, "Bio", &self.bio, BIO_RULES);
        check_optional(&mut errors, "Image", self.image.as_deref(), IMAGE_RULES);
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginPayload {
    pub user: LoginUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginUser {
    pub email: String,
    pub password: String,
}

impl LoginUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        check_field(&mut errors, "Email", &self.email, EMAIL_RULES);
        check_field(&mut errors, "Password", &self.password, PASSWORD_RULES);
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserPayload {
    pub user: UpdateUser,
}

/// Every field optional; a provided field follows the registration rules.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl UpdateUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        check_optional(&mut errors, "Username", self.username.as_deref(), USERNAME_RULES);
        check_optional(&mut errors, "Email", self.email.as_deref(), EMAIL_RULES);
        check_optional(&mut errors, "Password", self.password.as_deref(), PASSWORD_RULES);
        check_optional(&mut errors, "Bio", self.bio.as_deref(), BIO_RULES);
        check_optional(&mut errors, "Image", self.image.as_deref(), IMAGE_RULES);
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateArticlePayload {
    pub article: CreateArticle,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateArticle {
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
}

impl CreateArticle {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        check_field(&mut errors, "Title", &self.title, TITLE_RULES);
        check_field(&mut errors, "Description", &self.description, TEXT_RULES);
        check_field(&mut errors, "Body", &self.body, TEXT_RULES);
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateArticlePayload {
    pub article: UpdateArticle,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub tag_list: Option<Vec<String>>,
}

impl UpdateArticle {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        check_optional(&mut errors, "Title", self.title.as_deref(), TITLE_RULES);
        check_optional(&mut errors, "Description", self.description.as_deref(), TEXT_RULES);
        check_optional(&mut errors, "Body", self.body.as_deref(), TEXT_RULES);
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentPayload {
    pub comment: NewComment,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewComment {
    pub body: String,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        check_field(&mut errors, "Body", &self.body, COMMENT_RULES);
        errors.into_result()
    }
}
