use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::FieldError;
use crate::fields;
use crate::lexer::Token;
use super::{unknown_keyword, write_field, Section, SectionHeader};

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y:%m:%d %H:%M:%S"];
const WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The `<PROJECT>` section: free text describing the project
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSection {
    header: SectionHeader,
    pub title: Option<String>,
    pub originator: Option<String>,
    // @field: Creation date as written in the document
    create_date: Option<String>,
    pub notes: Option<String>,
    pub client_data: Option<String>,
}

impl ProjectSection {
    pub const TAG: &'static str = "PROJECT";

    pub fn new() -> Self {
        Self {
            header: SectionHeader::new(Self::TAG),
            title: None,
            originator: None,
            create_date: None,
            notes: None,
            client_data: None,
        }
    }

    /// Parse a creation date; a bare date means midnight
    pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
        DATE_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }

    pub fn create_date(&self) -> Option<&str> {
        self.create_date.as_deref()
    }

    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.create_date.as_deref().and_then(Self::parse_date)
    }

    pub fn set_created_at(&mut self, when: NaiveDateTime) {
        self.create_date = Some(when.format(WRITE_FORMAT).to_string());
    }
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self::new()
    }
}

impl Section for ProjectSection {
    fn header(&self) -> &SectionHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut SectionHeader {
        &mut self.header
    }

    fn add_data(&mut self, keyword: &str, data: &[Token]) -> Result<(), FieldError> {
        let data = fields::require(keyword, data, 1)?;
        match keyword.to_ascii_uppercase().as_str() {
            "PROJ_TITLE" => self.title = fields::optional_string(keyword, &data[0])?,
            "PROJ_ORIGINATOR" => self.originator = fields::optional_string(keyword, &data[0])?,
            "PROJ_NOTES" => self.notes = fields::optional_string(keyword, &data[0])?,
            "PROJ_CLIENT_DATA" => self.client_data = fields::optional_string(keyword, &data[0])?,
            "PROJ_CREATE_DATE" => {
                // unquoted dates arrive split at the space
                let text = data.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" ");
                if Self::parse_date(&text).is_none() {
                    return Err(FieldError::invalid(keyword, &text, "not a date"));
                }
                self.create_date = Some(text);
            }
            _ => return Err(unknown_keyword(keyword, self.name())),
        }
        Ok(())
    }
}

impl fmt::Display for ProjectSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n<{}>", self.header.tag())?;
        let text_fields = [
            ("PROJ_TITLE", &self.title),
            ("PROJ_ORIGINATOR", &self.originator),
            ("PROJ_CREATE_DATE", &self.create_date),
            ("PROJ_NOTES", &self.notes),
            ("PROJ_CLIENT_DATA", &self.client_data),
        ];
        for (keyword, value) in text_fields {
            if let Some(value) = value {
                write_field(f, keyword, fields::quote(value))?;
            }
        }
        write!(f, "\n</{}>", self.header.tag())
    }
}
