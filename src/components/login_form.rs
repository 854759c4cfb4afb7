use std::fmt::Display;
use serde::{Deserialize, Serialize};
use crate::{bases::*, extends::Processor};
use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginError {
    MissingCredentials,
    InvalidEmail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginFormState {
    pub email: String,
    pub password: String,
    pub error: Option<LoginError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginFormMessage {
    Email(String),
    Password(String),
    Rejected(Option<LoginError>),
}

impl Display for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "Email and password are required"),
            Self::InvalidEmail => write!(f, "Invalid email format"),
        }
    }
}

impl LoginFormState {
    pub fn validate(&self) -> core::result::Result<Credentials, LoginError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        if !self.email.contains('@') {
            return Err(LoginError::InvalidEmail);
        }

        Ok(Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

impl State for LoginFormState {
    type Message = LoginFormMessage;

    fn apply(&mut self, message: &LoginFormMessage) -> bool {
        use LoginFormMessage::*;

        match message {
            Email(email) if *email != self.email => self.email = email.clone(),
            Password(password) if *password != self.password => self.password = password.clone(),
            Rejected(error) if *error != self.error => self.error = *error,
            _ => return false,
        }
        true
    }
}

/// Collects an email and a password and hands them to the login handler
/// once they pass validation.
#[derive(Debug)]
pub struct LoginForm {
    processor: Processor<LoginFormState>,
    on_login: Emitter<Credentials>,
}

impl LoginForm {
    pub fn state(&self) -> &LoginFormState { self.processor.state() }
    pub fn error(&self) -> Option<LoginError> { self.processor.error }

    pub fn new<F>(on_login: F) -> Self
    where F: 'static + Fn(&str, &str) + Send + Sync {
        Self {
            processor: Processor::default(),
            on_login: Emitter::new_callback(move |packet: Packet<Credentials>| {
                let credentials = packet.message();
                on_login(&credentials.email, &credentials.password)
            }),
        }
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.processor.apply(LoginFormMessage::Email(email.into()));
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.processor.apply(LoginFormMessage::Password(password.into()));
    }

    /// Validates the fields. Returns whether the login handler was called.
    pub fn submit(&mut self) -> Result<bool> {
        self.processor.apply(LoginFormMessage::Rejected(None));

        match self.processor.validate() {
            Ok(credentials) => {
                self.on_login.emit(credentials)?;
                Ok(true)
            },
            Err(error) => {
                log::debug!("login rejected: {error}");
                self.processor.apply(LoginFormMessage::Rejected(Some(error)));
                Ok(false)
            },
        }
    }
}

impl View for LoginForm {
    fn view(&self) -> String {
        let mut lines = vec![
            format!("Email: {}", self.processor.email),
            format!("Password: {}", "*".repeat(self.processor.password.chars().count())),
        ];

        if let Some(error) = self.processor.error {
            lines.push(error.to_string());
        }

        lines.push("[Login]".to_string());
        lines.join("\n")
    }
}
