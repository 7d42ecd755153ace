use crate::identity::{LoginForm, ProfileForm, SignUpForm};
use crate::models::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    SignUp,
    Profile,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub secret: bool,
    pub max_len: Option<usize>,
}

impl FormField {
    fn text(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            secret: false,
            max_len: None,
        }
    }

    fn secret(label: &'static str) -> Self {
        Self {
            secret: true,
            ..Self::text(label)
        }
    }

    fn phone() -> Self {
        Self {
            max_len: Some(10),
            ..Self::text("Phone Number")
        }
    }

    fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    /// What the field shows on screen.
    pub fn display(&self) -> String {
        if self.secret {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// Text-entry screen state shared by login, sign-up and profile editing.
#[derive(Debug, Clone)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub error: Option<String>,
}

impl Form {
    fn with_fields(kind: FormKind, fields: Vec<FormField>) -> Self {
        Self {
            kind,
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn login() -> Self {
        Self::with_fields(
            FormKind::Login,
            vec![FormField::text("Email"), FormField::secret("Password")],
        )
    }

    pub fn sign_up() -> Self {
        Self::with_fields(
            FormKind::SignUp,
            vec![
                FormField::text("First Name"),
                FormField::text("Last Name"),
                FormField::text("Email"),
                FormField::phone(),
                FormField::secret("Password"),
                FormField::secret("Confirm Password"),
            ],
        )
    }

    pub fn profile(user: &User) -> Self {
        Self::with_fields(
            FormKind::Profile,
            vec![
                FormField::text("First Name").with_value(&user.profile.first_name),
                FormField::text("Last Name").with_value(&user.profile.last_name),
                FormField::text("Email").with_value(&user.email),
                FormField::phone().with_value(&user.profile.phone),
            ],
        )
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::Login => " NewsPalette: Catered For You ",
            FormKind::SignUp => " Sign Up ",
            FormKind::Profile => " Edit Profile ",
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.max_len.is_some_and(|max| field.value.chars().count() >= max) {
                return;
            }
            field.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    fn value(&self, index: usize) -> String {
        self.fields
            .get(index)
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }

    pub fn to_login(&self) -> LoginForm {
        LoginForm {
            email: self.value(0),
            password: self.value(1),
        }
    }

    pub fn to_sign_up(&self) -> SignUpForm {
        SignUpForm {
            first_name: self.value(0),
            last_name: self.value(1),
            email: self.value(2),
            phone: self.value(3),
            password: self.value(4),
            confirm_password: self.value(5),
        }
    }

    pub fn to_profile(&self) -> ProfileForm {
        ProfileForm {
            first_name: self.value(0),
            last_name: self.value(1),
            email: self.value(2),
            phone: self.value(3),
        }
    }
}
