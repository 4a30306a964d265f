use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::FieldError;
use crate::fields;
use crate::lexer::Token;
use super::{unknown_keyword, write_field, Section, SectionHeader};

// Dotted version numbers such as 01.00 or 03.03.00.00.04
static VERSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{1,2}(\.[0-9]{1,2})*$").expect("Invalid version regex")
});

/// The `<VERSION>` section: document identity and the writing application
#[derive(Debug, Clone, PartialEq)]
pub struct VersionSection {
    header: SectionHeader,
    pub adl_id: Option<String>,
    pub adl_uid: Option<String>,
    pub adl_version: Option<String>,
    pub creator: Option<String>,
    pub creator_version: Option<String>,
}

impl VersionSection {
    pub const TAG: &'static str = "VERSION";

    pub fn new() -> Self {
        Self {
            header: SectionHeader::new(Self::TAG),
            adl_id: None,
            adl_uid: None,
            adl_version: None,
            creator: None,
            creator_version: None,
        }
    }

    fn version(keyword: &str, token: &Token) -> Result<String, FieldError> {
        if VERSION_REGEX.is_match(&token.text) {
            Ok(token.text.clone())
        } else {
            Err(FieldError::invalid(keyword, &token.text, "not a dotted version number"))
        }
    }
}

impl Default for VersionSection {
    fn default() -> Self {
        Self::new()
    }
}

impl Section for VersionSection {
    fn header(&self) -> &SectionHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut SectionHeader {
        &mut self.header
    }

    fn add_data(&mut self, keyword: &str, data: &[Token]) -> Result<(), FieldError> {
        let data = fields::require(keyword, data, 1)?;
        match keyword.to_ascii_uppercase().as_str() {
            "ADL_ID" => self.adl_id = fields::optional_string(keyword, &data[0])?,
            "ADL_UID" => self.adl_uid = fields::optional_string(keyword, &data[0])?,
            "VER_ADL_VERSION" => self.adl_version = Some(Self::version(keyword, &data[0])?),
            "VER_CREATOR" => self.creator = fields::optional_string(keyword, &data[0])?,
            "VER_CRTR" => self.creator_version = Some(Self::version(keyword, &data[0])?),
            _ => return Err(unknown_keyword(keyword, self.name())),
        }
        Ok(())
    }
}

impl fmt::Display for VersionSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n<{}>", self.header.tag())?;
        if let Some(id) = &self.adl_id {
            write_field(f, "ADL_ID", fields::quote(id))?;
        }
        if let Some(uid) = &self.adl_uid {
            write_field(f, "ADL_UID", fields::quote(uid))?;
        }
        if let Some(version) = &self.adl_version {
            write_field(f, "VER_ADL_VERSION", version)?;
        }
        if let Some(creator) = &self.creator {
            write_field(f, "VER_CREATOR", fields::quote(creator))?;
        }
        if let Some(version) = &self.creator_version {
            write_field(f, "VER_CRTR", version)?;
        }
        write!(f, "\n</{}>", self.header.tag())
    }
}
