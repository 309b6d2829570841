//! Form validation for the create-activity, sign-up and sign-in screens.
//!
//! Validators never mutate state. They return a [`ValidationErrors`] map of
//! field name → inline message (Turkish UI copy) so the caller can show each
//! message next to its field.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::patterns::{RE_EMAIL, RE_TIME_OF_DAY};
use crate::roster::{ActivityDraft, ActivityInput};
use crate::types::{City, Sport};

pub const MIN_NAME_CHARS: usize = 3;
pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MIN_AGE_YEARS: i32 = 13;
pub const MAX_AGE_YEARS: i32 = 100;

/// Field-level validation messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: &str) {
        self.fields.insert(field.to_string(), message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn clear_field(&mut self, field: &str) {
        self.fields.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Create Activity
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_form_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn parse_form_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    if !RE_TIME_OF_DAY.is_match(value) {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Validates the create-activity form.
///
/// Title, date, time and location are required; description is optional.
/// The participant cap is resolved through [`AppConfig::resolve_max_participants`]
/// and never fails validation.
pub fn validate_activity(
    input: &ActivityInput,
    config: &AppConfig,
) -> Result<ActivityDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title = input.title.trim();
    if title.is_empty() {
        errors.insert("title", "Başlık zorunludur");
    }

    let location = input.location.trim();
    if location.is_empty() {
        errors.insert("location", "Konum zorunludur");
    }

    let date = if input.date.trim().is_empty() {
        errors.insert("date", "Tarih zorunludur");
        None
    } else {
        let parsed = parse_form_date(&input.date);
        if parsed.is_none() {
            errors.insert("date", "Geçerli bir tarih girin");
        }
        parsed
    };

    let time = if input.time.trim().is_empty() {
        errors.insert("time", "Saat zorunludur");
        None
    } else {
        let parsed = parse_form_time(&input.time);
        if parsed.is_none() {
            errors.insert("time", "Geçerli bir saat girin");
        }
        parsed
    };

    match (date, time) {
        (Some(date), Some(time)) if errors.is_empty() => Ok(ActivityDraft {
            sport: input.sport,
            title: title.to_string(),
            description: input.description.trim().to_string(),
            date,
            time,
            location: location.to_string(),
            city: input.city,
            max_participants: config.resolve_max_participants(input.max_participants),
        }),
        _ => Err(errors),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sign Up
// ═══════════════════════════════════════════════════════════════════════════════

/// Raw sign-up form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// `YYYY-MM-DD`, empty when not entered.
    pub birth_date: String,
    pub city: Option<City>,
    pub favorite_sports: Vec<Sport>,
}

/// Validated account data ready to hand to the session provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub birth_date: NaiveDate,
    pub city: City,
    pub favorite_sports: Vec<Sport>,
}

/// Step 1: name, email, password, password confirmation.
pub fn validate_account_step(form: &SignUpForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let name = form.name.trim();
    if name.is_empty() {
        errors.insert("name", "Ad Soyad zorunludur");
    } else if name.chars().count() < MIN_NAME_CHARS {
        errors.insert("name", "Ad Soyad en az 3 karakter olmalıdır");
    }

    if form.email.trim().is_empty() {
        errors.insert("email", "Email zorunludur");
    } else if !RE_EMAIL.is_match(&form.email) {
        errors.insert("email", "Geçerli bir email adresi girin");
    }

    if form.password.is_empty() {
        errors.insert("password", "Şifre zorunludur");
    } else if form.password.chars().count() < MIN_PASSWORD_CHARS {
        errors.insert("password", "Şifre en az 6 karakter olmalıdır");
    }

    if form.confirm_password.is_empty() {
        errors.insert("confirm_password", "Şifre tekrarı zorunludur");
    } else if form.password != form.confirm_password {
        errors.insert("confirm_password", "Şifreler eşleşmiyor");
    }

    errors
}

/// Step 2: birth date (age by calendar year within [13, 100]) and city.
pub fn validate_personal_step(form: &SignUpForm, today: NaiveDate) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if form.birth_date.trim().is_empty() {
        errors.insert("birth_date", "Doğum tarihi zorunludur");
    } else {
        match parse_form_date(&form.birth_date) {
            Some(birth) => {
                let age = today.year() - birth.year();
                if age < MIN_AGE_YEARS {
                    errors.insert("birth_date", "En az 13 yaşında olmalısınız");
                } else if age > MAX_AGE_YEARS {
                    errors.insert("birth_date", "Geçerli bir doğum tarihi girin");
                }
            }
            None => errors.insert("birth_date", "Geçerli bir doğum tarihi girin"),
        }
    }

    if form.city.is_none() {
        errors.insert("city", "Şehir seçimi zorunludur");
    }

    errors
}

/// Step 3: at least one favorite sport.
pub fn validate_interests_step(form: &SignUpForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if form.favorite_sports.is_empty() {
        errors.insert("favorite_sports", "En az bir spor seçmelisiniz");
    }
    errors
}

/// Three-step registration flow. Advances only when the current step validates.
#[derive(Debug, Clone)]
pub struct SignUpWizard {
    form: SignUpForm,
    step: u8,
    errors: ValidationErrors,
}

impl Default for SignUpWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SignUpWizard {
    pub const LAST_STEP: u8 = 3;

    pub fn new() -> Self {
        SignUpWizard {
            form: SignUpForm::default(),
            step: 1,
            errors: ValidationErrors::new(),
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn form(&self) -> &SignUpForm {
        &self.form
    }

    /// Mutable access to the form. Editing a field clears its stale message.
    pub fn edit(&mut self, field: &str, apply: impl FnOnce(&mut SignUpForm)) {
        apply(&mut self.form);
        self.errors.clear_field(field);
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn toggle_sport(&mut self, sport: Sport) {
        if let Some(pos) = self.form.favorite_sports.iter().position(|s| *s == sport) {
            self.form.favorite_sports.remove(pos);
        } else {
            self.form.favorite_sports.push(sport);
        }
        self.errors.clear_field("favorite_sports");
    }

    /// Validates the current step and moves forward on success.
    /// Returns whether the wizard advanced.
    pub fn next_step(&mut self, today: NaiveDate) -> bool {
        let errors = match self.step {
            1 => validate_account_step(&self.form),
            2 => validate_personal_step(&self.form, today),
            _ => return false,
        };
        let ok = errors.is_empty();
        self.errors = errors;
        if ok {
            self.step += 1;
        }
        ok
    }

    pub fn previous_step(&mut self) {
        if self.step > 1 {
            self.step -= 1;
        }
    }

    /// Validates the interests step and assembles the account.
    pub fn finish(&mut self) -> Result<NewAccount, ValidationErrors> {
        if self.step != Self::LAST_STEP {
            let mut errors = ValidationErrors::new();
            errors.insert("step", "Önceki adımları tamamlayın");
            return Err(errors);
        }

        let errors = validate_interests_step(&self.form);
        self.errors = errors.clone();
        if !errors.is_empty() {
            return Err(errors);
        }

        let birth_date = parse_form_date(&self.form.birth_date);
        match (birth_date, self.form.city) {
            (Some(birth_date), Some(city)) => Ok(NewAccount {
                name: self.form.name.trim().to_string(),
                email: self.form.email.trim().to_string(),
                password: self.form.password.clone(),
                birth_date,
                city,
                favorite_sports: self.form.favorite_sports.clone(),
            }),
            _ => {
                let mut errors = ValidationErrors::new();
                errors.insert("step", "Önceki adımları tamamlayın");
                Err(errors)
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sign In
// ═══════════════════════════════════════════════════════════════════════════════

pub fn validate_sign_in(email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if email.trim().is_empty() || password.is_empty() {
        errors.insert("form", "Lütfen email ve şifrenizi girin");
    }
    errors.into_result(())
}
