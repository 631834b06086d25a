use unicode_normalization::UnicodeNormalization;

use crate::{Error, Result};

pub(crate) const NAME_ERROR: &str = "Bitte geben Sie Ihren vollständigen Namen ein.";
pub(crate) const EMAIL_ERROR: &str = "Bitte geben Sie eine gültige E-Mail-Adresse ein.";
pub(crate) const PHONE_ERROR: &str = "Bitte geben Sie eine gültige Telefonnummer ein.";
pub(crate) const SERVICE_ERROR: &str = "Bitte wählen Sie einen Service aus.";
pub(crate) const MESSAGE_ERROR: &str = "Bitte geben Sie eine Nachricht mit mindestens 10 Zeichen ein.";
pub(crate) const PRIVACY_ERROR: &str = "Bitte stimmen Sie der Datenschutzerklärung zu.";

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const PHONE_SHELL_PATTERN: &str = r"^\+?[\d\s\-()]+$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
    pub privacy: bool,
}

impl SubmissionRecord {
    // Entries arrive in document order; the first entry per control name wins.
    pub(crate) fn from_entries(entries: &[(String, String)]) -> Self {
        Self {
            name: first_entry(entries, "name"),
            email: first_entry(entries, "email"),
            phone: first_entry(entries, "phone"),
            service: first_entry(entries, "service"),
            message: first_entry(entries, "message"),
            privacy: entries.iter().any(|(name, _)| name == "privacy"),
        }
    }
}

fn first_entry(entries: &[(String, String)], name: &str) -> String {
    entries
        .iter()
        .find(|(entry_name, _)| entry_name == name)
        .map(|(_, value)| value.nfc().collect())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
    Service,
    Message,
    Privacy,
}

impl Field {
    pub fn id(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Service => "service",
            Self::Message => "message",
            Self::Privacy => "privacy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

#[derive(Debug, Clone)]
pub(crate) struct Validator {
    email: fancy_regex::Regex,
    phone_shell: fancy_regex::Regex,
}

impl Validator {
    pub(crate) fn new() -> Result<Self> {
        let email = fancy_regex::Regex::new(EMAIL_PATTERN)
            .map_err(|e| Error::Runtime(format!("invalid email pattern: {e}")))?;
        let phone_shell = fancy_regex::Regex::new(PHONE_SHELL_PATTERN)
            .map_err(|e| Error::Runtime(format!("invalid phone pattern: {e}")))?;
        Ok(Self { email, phone_shell })
    }

    pub(crate) fn check(&self, record: &SubmissionRecord) -> Result<Vec<FieldError>> {
        let mut errors = Vec::new();

        if record.name.trim().chars().count() < 2 {
            errors.push(FieldError {
                field: Field::Name,
                message: NAME_ERROR,
            });
        }

        let email_ok = self
            .email
            .is_match(&record.email)
            .map_err(|e| Error::Runtime(format!("email check failed: {e}")))?;
        if record.email.is_empty() || !email_ok {
            errors.push(FieldError {
                field: Field::Email,
                message: EMAIL_ERROR,
            });
        }

        // Phone is optional; only a non-blank value is validated.
        if !record.phone.trim().is_empty() {
            let shell_ok = self
                .phone_shell
                .is_match(&record.phone)
                .map_err(|e| Error::Runtime(format!("phone check failed: {e}")))?;
            if !shell_ok || record.phone.trim().chars().count() < 6 {
                errors.push(FieldError {
                    field: Field::Phone,
                    message: PHONE_ERROR,
                });
            }
        }

        if record.service.is_empty() {
            errors.push(FieldError {
                field: Field::Service,
                message: SERVICE_ERROR,
            });
        }

        if record.message.trim().chars().count() < 10 {
            errors.push(FieldError {
                field: Field::Message,
                message: MESSAGE_ERROR,
            });
        }

        if !record.privacy {
            errors.push(FieldError {
                field: Field::Privacy,
                message: PRIVACY_ERROR,
            });
        }

        Ok(errors)
    }
}
