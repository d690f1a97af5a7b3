//! Language pack verification.

use crate::code::Code;
use crate::core::{LocaleInfo, LocalizedStrings};
use crate::error::Error;
use crate::result::Result;

/// Locale and strings an instance is expected to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleExpectation {
    /// Requested locale.
    pub locale: String,
    /// Active UI language.
    pub language: String,
    /// Translation of "Open".
    pub open: String,
    /// Translation of "Close".
    pub close: String,
    /// Translation of "Find".
    pub find: String,
}

impl LocaleExpectation {
    /// Expectation for the German language pack.
    pub fn german() -> Self {
        Self {
            locale: "de".to_string(),
            language: "de".to_string(),
            open: "öffnen".to_string(),
            close: "schließen".to_string(),
            find: "finden".to_string(),
        }
    }

    /// Compare reported values against the expectation, ignoring case.
    pub fn verify(&self, info: &LocaleInfo, strings: &LocalizedStrings) -> Result<()> {
        match &info.locale {
            Some(locale) if eq_ignore_case(locale, &self.locale) => {}
            Some(locale) => {
                return Err(Error::localization(format!(
                    "The requested locale was not '{}'. The received value is: {}",
                    self.locale, locale
                )));
            }
            None => {
                return Err(Error::localization(format!(
                    "The requested locale was not '{}'. The received value is: not set",
                    self.locale
                )));
            }
        }

        if !eq_ignore_case(&info.language, &self.language) {
            return Err(Error::localization(format!(
                "The UI language is not '{}'. It is {}",
                self.language, info.language
            )));
        }

        let strings_match = eq_ignore_case(&strings.open, &self.open)
            && eq_ignore_case(&strings.close, &self.close)
            && eq_ignore_case(&strings.find, &self.find);
        if !strings_match {
            return Err(Error::localization(format!(
                "Received wrong localized strings: {}",
                serde_json::to_string(strings).unwrap_or_default()
            )));
        }

        Ok(())
    }

    /// Query `code` and verify what it reports.
    pub async fn verify_instance(&self, code: &Code) -> Result<()> {
        let strings = code.localized_strings().await?;
        let info = code.locale_info().await?;
        self.verify(&info, &strings)
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
