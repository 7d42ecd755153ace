//! Form checks that run before any identity call is made.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::Profile;

use super::{ProfileUpdate, SignUp};

const PHONE_MAX_DIGITS: usize = 10;

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z]+$").expect("name pattern"))
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

fn invalid(message: &str) -> AppError {
    AppError::Validation(message.to_string())
}

fn check_names(first_name: &str, last_name: &str) -> Result<()> {
    if !name_re().is_match(first_name) || !name_re().is_match(last_name) {
        return Err(invalid("First and Last Name must contain only letters"));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<()> {
    if !email_re().is_match(email) {
        return Err(invalid("Please enter a valid email address"));
    }
    Ok(())
}

fn check_phone(phone: &str) -> Result<()> {
    if phone.len() > PHONE_MAX_DIGITS || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("Phone number must be up to 10 digits"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<SignUp> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let email = self.email.trim();
        let phone = self.phone.trim();

        let required = [
            first_name,
            last_name,
            email,
            phone,
            self.password.as_str(),
            self.confirm_password.as_str(),
        ];
        if required.iter().any(|field| field.is_empty()) {
            return Err(invalid("Please enter all required fields"));
        }

        check_names(first_name, last_name)?;
        check_email(email)?;
        check_phone(phone)?;

        if self.password != self.confirm_password {
            return Err(invalid("Passwords do not match"));
        }

        Ok(SignUp {
            email: email.to_string(),
            password: self.password.clone(),
            profile: Profile {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                phone: phone.to_string(),
            },
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Returns the trimmed email.
    pub fn validate(&self) -> Result<&str> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(invalid("Please enter both email and password"));
        }
        Ok(email)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl ProfileForm {
    pub fn from_user(user: &crate::models::User) -> Self {
        Self {
            first_name: user.profile.first_name.clone(),
            last_name: user.profile.last_name.clone(),
            email: user.email.clone(),
            phone: user.profile.phone.clone(),
        }
    }

    /// Email is only sent when it differs from `current_email`.
    pub fn validate(&self, current_email: &str) -> Result<ProfileUpdate> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let email = self.email.trim();
        let phone = self.phone.trim();

        if [first_name, last_name, email].iter().any(|field| field.is_empty()) {
            return Err(invalid("Please enter all required fields"));
        }

        check_names(first_name, last_name)?;
        check_email(email)?;
        check_phone(phone)?;

        Ok(ProfileUpdate {
            email: (email != current_email).then(|| email.to_string()),
            profile: Some(Profile {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                phone: phone.to_string(),
            }),
        })
    }
}
