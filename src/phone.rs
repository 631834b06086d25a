use crate::{Error, Result};

const GROUPING_PATTERN: &str = r"^(\+49)(\d{2,4})(\d+)";

// Rewrites arbitrary phone input into the +49 house format as the user types.
#[derive(Debug, Clone)]
pub(crate) struct PhoneFormatter {
    grouping: fancy_regex::Regex,
}

impl PhoneFormatter {
    pub(crate) fn new() -> Result<Self> {
        let grouping = fancy_regex::Regex::new(GROUPING_PATTERN)
            .map_err(|e| Error::Runtime(format!("invalid phone grouping pattern: {e}")))?;
        Ok(Self { grouping })
    }

    pub(crate) fn format(&self, raw: &str) -> Result<String> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

        let mut value = if digits.starts_with("49") {
            format!("+{digits}")
        } else if let Some(rest) = digits.strip_prefix('0') {
            format!("+49{rest}")
        } else {
            format!("+49{digits}")
        };

        let caps = self
            .grouping
            .captures(&value)
            .map_err(|e| Error::Runtime(format!("phone grouping failed: {e}")))?;
        if let Some(caps) = caps {
            let (Some(whole), Some(code), Some(area), Some(rest)) =
                (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
            else {
                return Ok(value);
            };
            let tail = value[whole.end()..].to_string();
            value = format!("{} {} {}{}", code.as_str(), area.as_str(), rest.as_str(), tail);
        }

        Ok(value)
    }
}
