//! Client-side validation for the dashboard's forms.
//!
//! Each form validates to a [`FieldErrors`]; an empty one means the form can
//! be submitted. Messages are keyed by the input's name.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::user::{DEFAULT_MONTHLY_HOURS, NewUser, User, UserUpdate};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.add("email", "Email is invalid");
        }

        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }

        errors
    }
}

/// The create-user dialog on the users page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub department: String,
    pub role: String,
}

impl UserForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "Name is required");
        } else if name.chars().count() < MIN_NAME_LEN {
            errors.add("name", "Name must be at least 2 characters long");
        }

        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.add("email", "Please enter a valid email address");
        }

        if self.role.trim().is_empty() {
            errors.add("role", "Role is required");
        }

        errors
    }

    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            department: self.department.trim().to_string(),
            role: self.role.trim().to_string(),
            salary: None,
            overhead: None,
            monthly_hours: DEFAULT_MONTHLY_HOURS,
        }
    }
}

/// A resource with its cost attributes, as edited on the resources page.
/// Numeric inputs stay text until submission; blank means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceForm {
    pub name: String,
    pub email: String,
    pub department: String,
    pub role: String,
    pub salary: String,
    pub overhead: String,
    pub monthly_hours: String,
}

/// `Some(None)` for a blank input, `None` when it is not a usable amount.
fn parse_amount(input: &str) -> Option<Option<f64>> {
    let input = input.trim();
    if input.is_empty() {
        return Some(None);
    }

    match input.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(Some(value)),
        _ => None,
    }
}

fn number_text(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ResourceForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            department: user.department.clone(),
            role: user.role.clone().unwrap_or_default(),
            salary: number_text(user.salary),
            overhead: number_text(user.overhead),
            monthly_hours: number_text(user.monthly_hours),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        if self.name.trim().is_empty() {
            errors.add("name", "Name is required");
        }
        if !is_valid_email(&self.email) {
            errors.add("email", "Valid email is required");
        }
        if parse_amount(&self.salary).is_none() {
            errors.add("salary", "Salary must be a positive number");
        }
        if parse_amount(&self.overhead).is_none() {
            errors.add("overhead", "Overhead must be a positive number");
        }
        if parse_amount(&self.monthly_hours).is_none() {
            errors.add("monthlyHours", "Monthly hours must be a positive number");
        }

        errors
    }

    /// `None` while the form has errors.
    pub fn to_new_user(&self) -> Option<NewUser> {
        if !self.validate().is_empty() {
            return None;
        }

        Some(NewUser {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            department: self.department.trim().to_string(),
            role: self.role.trim().to_string(),
            salary: parse_amount(&self.salary)?,
            overhead: parse_amount(&self.overhead)?,
            monthly_hours: parse_amount(&self.monthly_hours)?.unwrap_or(DEFAULT_MONTHLY_HOURS),
        })
    }

    /// Every field is sent; blank numbers are left out rather than cleared.
    pub fn to_update(&self) -> Option<UserUpdate> {
        if !self.validate().is_empty() {
            return None;
        }

        Some(UserUpdate {
            name: Some(self.name.trim().to_string()),
            email: Some(self.email.trim().to_string()),
            department: Some(self.department.trim().to_string()),
            role: Some(self.role.trim().to_string()),
            salary: parse_amount(&self.salary)?,
            overhead: parse_amount(&self.overhead)?,
            monthly_hours: parse_amount(&self.monthly_hours)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl PasswordChange {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        if self.current_password.is_empty() {
            errors.add("currentPassword", "Current password is required");
        }

        if self.new_password.is_empty() {
            errors.add("newPassword", "New password is required");
        } else if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "newPassword",
                "New password must be at least 6 characters long",
            );
        } else if self.new_password == self.current_password {
            errors.add(
                "newPassword",
                "New password must be different from the current password",
            );
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a@b.co", true)]
    #[case("  asha@example.com ", true)]
    #[case("asha@example", false)]
    #[case("asha example@x.com", false)]
    #[case("@example.com", false)]
    #[case("", false)]
    fn email_shape(#[case] email: &str, #[case] valid: bool) {
        assert_eq!(is_valid_email(email), valid);
    }

    #[rstest]
    #[case::ok("asha@example.com", "secret", None, None)]
    #[case::empty("", "", Some("Email is required"), Some("Password is required"))]
    #[case::blank_email("   ", "x", Some("Email is required"), None)]
    #[case::bad_email("asha", "x", Some("Email is invalid"), None)]
    fn login(
        #[case] email: &str,
        #[case] password: &str,
        #[case] email_error: Option<&str>,
        #[case] password_error: Option<&str>,
    ) {
        let errors = LoginForm {
            email: email.into(),
            password: password.into(),
        }
        .validate();

        assert_eq!(errors.get("email"), email_error);
        assert_eq!(errors.get("password"), password_error);
    }

    #[rstest]
    #[case::empty_name("", "name", "Name is required")]
    #[case::short_name("A", "name", "Name must be at least 2 characters long")]
    fn user_form_rejects_names(#[case] name: &str, #[case] field: &str, #[case] message: &str) {
        let form = UserForm {
            name: name.into(),
            email: "a@b.co".into(),
            role: "Developer".into(),
            ..Default::default()
        };
        assert_eq!(form.validate().get(field), Some(message));
    }

    #[test]
    fn user_form_requires_email_and_role() {
        let errors = UserForm {
            name: "Asha".into(),
            email: "not-an-email".into(),
            ..Default::default()
        }
        .validate();

        assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
        assert_eq!(errors.get("role"), Some("Role is required"));
        assert_eq!(errors.get("name"), None);
    }

    #[test]
    fn user_form_builds_trimmed_user() {
        let form = UserForm {
            name: " Asha ".into(),
            email: "asha@example.com".into(),
            department: "QA".into(),
            role: "Tester".into(),
        };
        assert!(form.validate().is_empty());

        let user = form.to_new_user();
        assert_eq!(user.name, "Asha");
        assert_eq!(user.monthly_hours, DEFAULT_MONTHLY_HOURS);
    }

    #[test]
    fn resource_defaults_monthly_hours() {
        let form = ResourceForm {
            name: "Ravi".into(),
            email: "ravi@example.com".into(),
            salary: "1200000".into(),
            ..Default::default()
        };

        let user = form.to_new_user().unwrap();
        assert_eq!(user.salary, Some(1_200_000.0));
        assert_eq!(user.overhead, None);
        assert_eq!(user.monthly_hours, 160.0);
    }

    #[test]
    fn resource_salary_is_annual() {
        let form = ResourceForm {
            name: "Ravi".into(),
            email: "ravi@example.com".into(),
            salary: "1200000".into(),
            overhead: "10".into(),
            ..Default::default()
        };
        let new_user = form.to_new_user().unwrap();

        let user: User = serde_json::from_value(serde_json::json!({
            "_id": "1", "name": new_user.name, "email": new_user.email,
            "salary": new_user.salary, "overhead": new_user.overhead,
            "monthlyHours": new_user.monthly_hours
        }))
        .unwrap();
        assert_eq!(user.monthly_cost().map(f64::round), Some(110_000.0));
    }

    #[rstest]
    #[case::blank("  ", Some(None))]
    #[case::number("2500.5", Some(Some(2500.5)))]
    #[case::negative("-1", None)]
    #[case::infinite("inf", None)]
    fn amounts(#[case] input: &str, #[case] expected: Option<Option<f64>>) {
        assert_eq!(parse_amount(input), expected);
    }

    #[rstest]
    #[case::text("salary", "lots")]
    #[case::negative("overhead", "-5")]
    #[case::nan("monthlyHours", "NaN")]
    fn resource_rejects_bad_numbers(#[case] field: &str, #[case] value: &str) {
        let mut form = ResourceForm {
            name: "Ravi".into(),
            email: "ravi@example.com".into(),
            ..Default::default()
        };
        match field {
            "salary" => form.salary = value.into(),
            "overhead" => form.overhead = value.into(),
            _ => form.monthly_hours = value.into(),
        }

        assert!(form.validate().get(field).is_some());
        assert_eq!(form.to_new_user(), None);
        assert_eq!(form.to_update(), None);
    }

    #[test]
    fn resource_round_trips_user() {
        let user: User = serde_json::from_value(serde_json::json!({
            "_id": "1", "name": "Mina", "email": "mina@example.com",
            "salary": 600000, "overhead": 12.5
        }))
        .unwrap();

        let form = ResourceForm::from_user(&user);
        assert_eq!(form.salary, "600000");
        assert_eq!(form.monthly_hours, "");

        let update = form.to_update().unwrap();
        assert_eq!(update.overhead, Some(12.5));
        assert_eq!(update.monthly_hours, None);
    }

    #[rstest]
    #[case::ok("old-pass", "new-pass", None, None)]
    #[case::missing("", "", Some("Current password is required"), Some("New password is required"))]
    #[case::short("old-pass", "abc", None, Some("New password must be at least 6 characters long"))]
    #[case::same("samesame", "samesame", None, Some("New password must be different from the current password"))]
    fn password_change(
        #[case] current: &str,
        #[case] new: &str,
        #[case] current_error: Option<&str>,
        #[case] new_error: Option<&str>,
    ) {
        let errors = PasswordChange {
            current_password: current.into(),
            new_password: new.into(),
        }
        .validate();

        assert_eq!(errors.get("currentPassword"), current_error);
        assert_eq!(errors.get("newPassword"), new_error);
    }
}
