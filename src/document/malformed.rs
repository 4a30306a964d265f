use crate::lexer::Token;

/// Keyword data collected outside of any open section.
///
/// A record stays open until a close tag for an unopened section is
/// found; that tag's name becomes the guess of which section the data
/// belonged to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MalformedRecord {
    fields: Vec<(String, Vec<String>)>,
    closed: bool,
    likely_section: Option<String>,
}

impl MalformedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, keyword: &str, data: &[Token]) {
        let values = data.iter().map(|t| t.text.clone()).collect();
        self.fields.push((keyword.to_string(), values));
    }

    /// `(keyword, data)` pairs in document order
    pub fn fields(&self) -> &[(String, Vec<String>)] {
        &self.fields
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Name of the section the data most likely belonged to
    pub fn likely_section(&self) -> Option<&str> {
        self.likely_section.as_deref()
    }

    /// Record the guess and close the record
    pub fn set_likely_section(&mut self, name: &str) {
        self.likely_section = Some(name.to_string());
        self.closed = true;
    }
}
