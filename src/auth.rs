use crate::models::{LoginRequest, RegisterRequest};

/// Registration fields after validation, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
}

pub fn validate_username(username: &str) -> Result<(), String> {
    let trimmed = username.trim();
    if trimmed.len() < 3 || trimmed.len() > 20 {
        return Err("Username must be 3-20 characters long".to_string());
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err("Username may only contain letters, numbers, and underscore".to_string());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }
    if password.len() > 50 {
        return Err("Password must be at most 50 characters long".to_string());
    }
    Ok(())
}

/// Deliberately simple shape check: one `@`, something before it, and a dot
/// somewhere inside the domain.
pub fn validate_email(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    let invalid = || "Please enter a valid email address".to_string();

    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(invalid());
    };
    if local.is_empty() || domain.contains('@') || trimmed.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return Err(invalid());
    };
    if host.is_empty() || tld.is_empty() {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_login(request: &LoginRequest) -> Result<(), String> {
    validate_username(&request.username)?;
    validate_password(&request.password)?;
    Ok(())
}

/// Full registration validation. A blank full name falls back to the
/// username.
pub fn validate_registration(request: &RegisterRequest) -> Result<RegistrationForm, String> {
    validate_username(&request.username)?;
    validate_password(&request.password)?;
    validate_email(&request.email)?;

    let username = request.username.trim().to_string();
    let full_name = {
        let trimmed = request.full_name.trim();
        if trimmed.is_empty() {
            username.clone()
        } else {
            trimmed.to_string()
        }
    };

    Ok(RegistrationForm {
        full_name,
        username,
        password: request.password.clone(),
        email: request.email.trim().to_string(),
        phone: request.phone.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("bob").is_ok());
        assert!(validate_username("a_1_B_2").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("x".repeat(21).as_str()).is_err());
        assert!(validate_username("with space").is_err());
        assert!(validate_username("dash-ed").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(50)).is_ok());
        assert!(validate_password(&"p".repeat(51)).is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("  user@example.com  ").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("user@dot.").is_err());
        assert!(validate_email("two@@example.com").is_err());
    }

    #[test]
    fn blank_full_name_defaults_to_username() {
        let form = validate_registration(&RegisterRequest {
            username: "alice".to_string(),
            password: "hunter22".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "   ".to_string(),
            phone: String::new(),
        })
        .unwrap();

        assert_eq!(form.full_name, "alice");
    }
}
