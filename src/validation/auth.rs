use garde::Validate;
use serde::Deserialize;

use crate::{
    error::Result,
    models::identity::ProfileUpdate,
    services::auth::Credentials,
};

/// The login form.
#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1, max = 128))]
    pub password: String,
}

/// The registration form.
#[derive(Deserialize, Validate)]
pub struct RegisterForm {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 8, max = 128))]
    pub password: String,
    #[garde(dive)]
    #[serde(flatten)]
    pub profile: ProfileForm,
}

/// The profile editing form. Every field is optional.
#[derive(Deserialize, Validate, Default)]
pub struct ProfileForm {
    #[garde(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[garde(length(min = 1, max = 32))]
    pub phone: Option<String>,
    #[garde(length(min = 1, max = 32))]
    pub registration_number: Option<String>,
    #[garde(length(min = 1, max = 80))]
    pub specialty: Option<String>,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm").field("email", &self.email).finish_non_exhaustive()
    }
}

impl std::fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterForm").field("email", &self.email).finish_non_exhaustive()
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

impl From<ProfileForm> for ProfileUpdate {
    fn from(form: ProfileForm) -> Self {
        Self {
            name: form.name,
            phone: form.phone,
            registration_number: form.registration_number,
            specialty: form.specialty,
        }
    }
}

impl LoginForm {
    /// Validates the form and converts it to credentials.
    pub fn into_credentials(mut self) -> Result<Credentials> {
        self.email = self.email.trim().to_string();
        self.validate()?;
        Ok(Credentials::new(self.email, self.password))
    }
}

impl RegisterForm {
    /// Validates the form and splits it into credentials and profile fields.
    pub fn into_parts(mut self) -> Result<(Credentials, ProfileUpdate)> {
        self.email = self.email.trim().to_string();
        self.profile = self.profile.trim();
        self.validate()?;
        Ok((
            Credentials::new(self.email, self.password),
            self.profile.into(),
        ))
    }
}

impl ProfileForm {
    /// Trims surrounding whitespace from every provided field.
    fn trim(self) -> Self {
        Self {
            name: trimmed(self.name),
            phone: trimmed(self.phone),
            registration_number: trimmed(self.registration_number),
            specialty: trimmed(self.specialty),
        }
    }

    /// Validates the trimmed form and converts it to a profile update.
    pub fn into_update(self) -> Result<ProfileUpdate> {
        let form = self.trim();
        form.validate()?;
        Ok(form.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn login(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn login_form_checks_email_format() {
        assert!(login("doc@example.com", "pw").into_credentials().is_ok());
        assert!(matches!(
            login("not-an-email", "pw").into_credentials(),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            login("doc@example.com", "").into_credentials(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn register_form_requires_a_long_password() {
        let form = RegisterForm {
            email: "doc@example.com".to_string(),
            password: "short".to_string(),
            profile: ProfileForm::default(),
        };
        assert!(matches!(form.into_parts(), Err(AppError::Validation(_))));
    }

    #[test]
    fn register_form_carries_profile_fields() {
        let form = RegisterForm {
            email: "doc@example.com".to_string(),
            password: "long enough".to_string(),
            profile: ProfileForm {
                name: Some(" Dr. Lima ".to_string()),
                specialty: Some("Neurology".to_string()),
                ..Default::default()
            },
        };

        let (credentials, profile) = form.into_parts().unwrap();
        assert_eq!(credentials.email, "doc@example.com");
        assert_eq!(profile.name.as_deref(), Some("Dr. Lima"));
        assert_eq!(profile.specialty.as_deref(), Some("Neurology"));
        assert_eq!(profile.phone, None);
    }

    #[test]
    fn profile_form_rejects_whitespace_only_values() {
        let form = ProfileForm {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(form.into_update(), Err(AppError::Validation(_))));

        let form = ProfileForm {
            name: Some("  Dr. Lima ".to_string()),
            ..Default::default()
        };
        assert_eq!(form.into_update().unwrap().name.as_deref(), Some("Dr. Lima"));
    }

    #[test]
    fn register_form_rejects_a_blank_name() {
        let form = RegisterForm {
            email: "doc@example.com".to_string(),
            password: "long enough".to_string(),
            profile: ProfileForm {
                name: Some(" ".to_string()),
                ..Default::default()
            },
        };
        assert!(matches!(form.into_parts(), Err(AppError::Validation(_))));
    }

    #[test]
    fn login_form_trims_the_email_before_checking_it() {
        let credentials = login("  doc@example.com ", "pw").into_credentials().unwrap();
        assert_eq!(credentials.email, "doc@example.com");
    }

    #[test]
    fn profile_form_rejects_empty_values() {
        let form = ProfileForm {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(form.into_update(), Err(AppError::Validation(_))));
    }
}
