//! Request validation: per-field rules, collected into field-level errors.

use crate::error::{AppError, FieldErrors};
use crate::model::*;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;

/// Rule for one text field. Lengths count characters.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<(&'static Regex, &'static str)>,
}

impl TextRule {
    pub const fn optional(max_length: usize) -> Self {
        TextRule {
            required: false,
            min_length: None,
            max_length: Some(max_length),
            pattern: None,
        }
    }

    pub const fn required(max_length: usize) -> Self {
        TextRule {
            required: true,
            min_length: None,
            max_length: Some(max_length),
            pattern: None,
        }
    }

    pub fn matching(mut self, re: &'static Regex, message: &'static str) -> Self {
        self.pattern = Some((re, message));
        self
    }
}

fn username_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w.@+-]+$").expect("static regex"))
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 -]*$").expect("static regex"))
}

const USERNAME_MAX: usize = 150;
const NAME_MAX: usize = 100;
const PHONE_MAX: usize = 15;
const LOCATION_MAX: usize = 200;
const LICENSE_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 8;
/// NUMERIC(10, 2): at most 8 integer digits.
const PRICE_LIMIT: i64 = 100_000_000;

/// Accumulates field errors across a whole payload.
#[derive(Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, field: &str, value: &str, rule: TextRule) -> &mut Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            if rule.required {
                self.errors.add(field, "this field is required");
            }
            return self;
        }
        let len = value.chars().count();
        if let Some(max) = rule.max_length {
            if len > max {
                self.errors.add(field, format!("must be at most {} characters", max));
            }
        }
        if let Some(min) = rule.min_length {
            if len < min {
                self.errors.add(field, format!("must be at least {} characters", min));
            }
        }
        if let Some((re, message)) = rule.pattern {
            if !re.is_match(value) {
                self.errors.add(field, message);
            }
        }
        self
    }

    /// Same as [`text`](Self::text) for PATCH fields: absent means unchanged, present must pass.
    pub fn text_opt(&mut self, field: &str, value: Option<&str>, rule: TextRule) -> &mut Self {
        if let Some(v) = value {
            self.text(field, v, rule);
        }
        self
    }

    pub fn quantity(&mut self, field: &str, value: i32) -> &mut Self {
        if value < 0 {
            self.errors.add(field, "must be at least 0");
        }
        self
    }

    pub fn price(&mut self, field: &str, value: Decimal) -> &mut Self {
        if value.is_sign_negative() && !value.is_zero() {
            self.errors.add(field, "must be at least 0");
        }
        if value.normalize().scale() > 2 {
            self.errors.add(field, "must have at most 2 decimal places");
        }
        if value.abs() >= Decimal::from(PRICE_LIMIT) {
            self.errors.add(field, "must have at most 10 digits");
        }
        self
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.add(field, message);
        self
    }

    pub fn finish(&mut self) -> Result<(), AppError> {
        std::mem::take(&mut self.errors).into_result()
    }
}

/// Payloads that check themselves before reaching the store.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

fn phone(max: usize, required: bool) -> TextRule {
    let rule = if required {
        TextRule::required(max)
    } else {
        TextRule::optional(max)
    };
    rule.matching(phone_re(), "must be a phone number")
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        v.text(
            "username",
            &self.username,
            TextRule::required(USERNAME_MAX).matching(username_re(), "may contain only letters, digits and @.+-_"),
        )
        .text("name", &self.name, TextRule::optional(NAME_MAX))
        .text("phone_number", &self.phone_number, phone(PHONE_MAX, false))
        .text("location", &self.location, TextRule::optional(LOCATION_MAX))
        .text(
            "password",
            &self.password,
            TextRule {
                required: true,
                min_length: Some(PASSWORD_MIN),
                max_length: None,
                pattern: None,
            },
        );
        if self.password != self.password_confirm {
            v.add("password_confirm", "passwords do not match");
        }
        if self.is_pharmacy {
            v.text(
                "store_name",
                self.store_name.as_deref().unwrap_or_default(),
                TextRule::required(NAME_MAX),
            )
            .text(
                "license_number",
                self.license_number.as_deref().unwrap_or_default(),
                TextRule::required(LICENSE_MAX),
            );
        }
        v.finish()
    }
}

impl Validate for AccountPatch {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .text_opt("name", self.name.as_deref(), TextRule::optional(NAME_MAX))
            .text_opt("phone_number", self.phone_number.as_deref(), phone(PHONE_MAX, false))
            .text_opt("location", self.location.as_deref(), TextRule::optional(LOCATION_MAX))
            .finish()
    }
}

impl Validate for NewPharmacy {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .text("store_name", &self.store_name, TextRule::required(NAME_MAX))
            .text("license_number", &self.license_number, TextRule::required(LICENSE_MAX))
            .text("location", &self.location, TextRule::optional(LOCATION_MAX))
            .text("contact_number", &self.contact_number, phone(PHONE_MAX, false))
            .finish()
    }
}

impl Validate for PharmacyPatch {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .text_opt("store_name", self.store_name.as_deref(), TextRule::required(NAME_MAX))
            .text_opt("license_number", self.license_number.as_deref(), TextRule::required(LICENSE_MAX))
            .text_opt("location", self.location.as_deref(), TextRule::optional(LOCATION_MAX))
            .text_opt("contact_number", self.contact_number.as_deref(), phone(PHONE_MAX, false))
            .finish()
    }
}

impl Validate for NewMedicine {
    fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        v.text("name", &self.name, TextRule::required(NAME_MAX))
            .text("brand", &self.brand, TextRule::optional(NAME_MAX))
            .text("category", &self.category, TextRule::optional(NAME_MAX));
        match self.price {
            Some(p) => {
                v.price("price", p);
            }
            None => {
                v.add("price", "this field is required");
            }
        }
        v.finish()
    }
}

impl Validate for MedicinePatch {
    fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        v.text_opt("name", self.name.as_deref(), TextRule::required(NAME_MAX))
            .text_opt("brand", self.brand.as_deref(), TextRule::optional(NAME_MAX))
            .text_opt("category", self.category.as_deref(), TextRule::optional(NAME_MAX));
        if let Some(p) = self.price {
            v.price("price", p);
        }
        v.finish()
    }
}

impl Validate for AddMedicineRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new().quantity("quantity", self.quantity).finish()
    }
}

impl Validate for InventoryPatch {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new().quantity("quantity", self.quantity).finish()
    }
}

impl Validate for NewSearchLog {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .text("medicine_name", &self.medicine_name, TextRule::required(NAME_MAX))
            .finish()
    }
}

impl Validate for NewSmsRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .text("phone_number", &self.phone_number, phone(PHONE_MAX, true))
            .text("medicine_name", &self.medicine_name, TextRule::required(NAME_MAX))
            .text("location", &self.location, TextRule::required(LOCATION_MAX))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            username: "alice".into(),
            name: "Alice".into(),
            phone_number: "+15550100".into(),
            address: String::new(),
            location: String::new(),
            is_pharmacy: false,
            is_smartphone_user: true,
            password: password.into(),
            password_confirm: confirm.into(),
            store_name: None,
            license_number: None,
        }
    }

    fn field_errors(err: AppError) -> FieldErrors {
        match err {
            AppError::Validation(e) => e,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn password_mismatch_is_reported_on_confirm_field() {
        let errors = field_errors(register("correct horse", "battery staple").validate().unwrap_err());
        assert_eq!(errors.get("password_confirm"), Some(&["passwords do not match".to_string()][..]));
        assert!(errors.get("password").is_none());
    }

    #[test]
    fn matching_passwords_pass() {
        assert!(register("correct horse", "correct horse").validate().is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        let errors = field_errors(register("short", "short").validate().unwrap_err());
        assert!(errors.get("password").is_some());
    }

    #[test]
    fn pharmacy_registration_needs_store_details() {
        let mut req = register("correct horse", "correct horse");
        req.is_pharmacy = true;
        let errors = field_errors(req.validate().unwrap_err());
        assert!(errors.get("store_name").is_some());
        assert!(errors.get("license_number").is_some());
    }

    #[test]
    fn username_and_phone_patterns() {
        let mut req = register("correct horse", "correct horse");
        req.username = "bad name!".into();
        req.phone_number = "call me".into();
        let errors = field_errors(req.validate().unwrap_err());
        assert!(errors.get("username").is_some());
        assert!(errors.get("phone_number").is_some());
    }

    #[test]
    fn medicine_price_rules() {
        let mut m = NewMedicine {
            name: "Aspirin".into(),
            brand: String::new(),
            category: String::new(),
            description: String::new(),
            price: None,
            alternative_medicine_ids: Vec::new(),
        };
        assert!(field_errors(m.validate().unwrap_err()).get("price").is_some());
        m.price = Some(Decimal::new(-1, 0));
        assert!(m.validate().is_err());
        m.price = Some(Decimal::new(12345, 3));
        assert!(m.validate().is_err());
        m.price = Some(Decimal::new(1250, 2));
        assert!(m.validate().is_ok());
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let req = AddMedicineRequest { medicine_id: 1, quantity: -3, pharmacy_id: None };
        assert!(req.validate().is_err());
        assert!(InventoryPatch { quantity: 0 }.validate().is_ok());
    }

    #[test]
    fn sms_request_requires_all_fields() {
        let req = NewSmsRequest {
            phone_number: String::new(),
            medicine_name: "x".repeat(101),
            location: "Main St".into(),
        };
        let errors = field_errors(req.validate().unwrap_err());
        assert!(errors.get("phone_number").is_some());
        assert!(errors.get("medicine_name").is_some());
        assert!(errors.get("location").is_none());
    }
}
