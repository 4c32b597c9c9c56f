use crate::api::{LoginRequest, RegisterRequest, UserType};

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn validate_credentials(username: &str, password: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Please enter your username".into());
    }
    if password.is_empty() {
        return Err("Please enter your password".into());
    }
    Ok(())
}

pub fn login_request(username: &str, password: &str) -> Result<LoginRequest, String> {
    validate_credentials(username, password)?;
    Ok(LoginRequest {
        username: username.trim().to_string(),
        password: password.to_string(),
    })
}

/// Loose `local@domain.tld` shape check; the server has the final word.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("Please choose a username".into());
        }
        if !is_valid_email(&self.email) {
            return Err("Please enter a valid email address".into());
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            ));
        }
        if self.password != self.confirm_password {
            return Err("Passwords don't match".into());
        }
        Ok(())
    }

    pub fn to_request(&self) -> Result<RegisterRequest, String> {
        self.validate()?;
        Ok(RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            user_type: self.user_type,
        })
    }
}
