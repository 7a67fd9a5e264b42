use serde::{Deserialize, Serialize};

use super::service::ServiceError;
use crate::state::LoadingState;

/// User profile as returned by the profile service.
///
/// Optional fields are business data the user has not provided yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub login: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Lifecycle of the profile screen.
pub type ProfileState = LoadingState<Profile, ServiceError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitledText {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitledOptionalText {
    pub title: String,
    pub text: Option<String>,
}

/// Everything the profile view renders for a loaded profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileViewModel {
    pub first_name: TitledText,
    pub last_name: TitledText,
    pub middle_name: TitledOptionalText,
    pub login: TitledText,
    pub email: TitledOptionalText,
    pub phone: TitledOptionalText,
    pub my_orders: String,
}

/// Content of the error overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorMessageViewModel {
    pub title: String,
    pub button_title: String,
}

fn titled(title: &str, text: &str) -> TitledText {
    TitledText {
        title: title.to_string(),
        text: text.to_string(),
    }
}

fn titled_optional(title: &str, text: Option<&String>) -> TitledOptionalText {
    TitledOptionalText {
        title: title.to_string(),
        text: text.cloned(),
    }
}

impl ProfileViewModel {
    pub fn from_profile(profile: &Profile) -> Self {
        let email_title = if profile.email.is_none() {
            "Добавить e-mail"
        } else {
            "E-mail"
        };

        Self {
            first_name: titled("Имя", &profile.first_name),
            last_name: titled("Фамилия", &profile.last_name),
            middle_name: titled_optional("Отчество", profile.middle_name.as_ref()),
            login: titled("Никнейм", &profile.login),
            email: titled_optional(email_title, profile.email.as_ref()),
            phone: titled_optional("Телефон", profile.phone.as_ref()),
            my_orders: "Мои заказы".to_string(),
        }
    }
}

impl ErrorMessageViewModel {
    pub fn from_error(error: &ServiceError) -> Self {
        Self {
            title: error.to_string(),
            button_title: "Повторить".to_string(),
        }
    }
}
