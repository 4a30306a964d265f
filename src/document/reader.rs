/*!
 * Section parsing protocol.
 *
 * `read_section` runs after a section's open tag has been consumed and
 * reads keyword groups into the section until its close tag. Problems
 * with the tag structure are structural errors: by default they are
 * recorded on the section and parsing continues, `stop_on_error` ends
 * the section early and `strict` aborts the whole parse.
 *
 * An open tag found inside a section is the usual sign of a missing close
 * tag. The first one is pushed back and its token position remembered;
 * once the section is done the lexer replays the input up to that point
 * so that the enclosing loop reads the tag again, as a sibling.
 */

use log::{debug, warn};

use crate::app_config::ParserConfig;
use crate::errors::AdlError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::sections::{Section, SectionHeader};
use super::{Document, MalformedRecord, SectionBody, SectionKind, ROOT_TAG};

enum Flow {
    Continue,
    Stop,
}

fn structural(header: &mut SectionHeader, config: &ParserConfig, message: String) -> Result<Flow, AdlError> {
    warn!("{}", message);
    if config.strict {
        return Err(AdlError::Structural {
            section: header.tag().to_string(),
            message,
        });
    }
    header.add_error(message);
    Ok(if config.stop_on_error { Flow::Stop } else { Flow::Continue })
}

/// Read keyword data into an opened section up to its close tag.
///
/// Returns whether the section was free of structural errors.
pub fn read_section<S: Section + ?Sized>(
    section: &mut S,
    lexer: &mut Lexer,
    config: &ParserConfig,
) -> Result<bool, AdlError> {
    let name = section.name().to_string();
    let mut rewind_point: Option<usize> = None;
    let mut well_formed = true;
    section.header_mut().open();

    loop {
        let token = lexer.next_token();
        let message = match token.kind {
            TokenKind::Comment => continue,
            TokenKind::EndOfInput => break,
            TokenKind::SectionClose if token.names(&name) => {
                section.header_mut().close();
                break;
            }
            TokenKind::Keyword => {
                let data = lexer.data_for_keyword();
                if let Err(e) = section.add_data(&token.text, &data) {
                    section.header_mut().add_error(format!("{} At line: {}", e, token.line));
                }
                continue;
            }
            TokenKind::SectionOpen => {
                let message = format!(
                    "Found overlapping SECTION Tags. <{}> inside of <{}> At line: {}",
                    token.text, name, token.line
                );
                if rewind_point.is_none() {
                    lexer.push_back();
                    rewind_point = Some(lexer.token_position());
                }
                message
            }
            TokenKind::SectionClose => {
                format!("</{}> close tag found within {} SECTION At line: {}", token.text, name, token.line)
            }
            TokenKind::Data => {
                format!("Unexpected data found in {} section. \"{}\" At line: {}", name, token.text, token.line)
            }
        };

        well_formed = false;
        if let Flow::Stop = structural(section.header_mut(), config, message)? {
            return Ok(false);
        }
    }

    if !section.header().is_closed() {
        well_formed = false;
        let message = format!("{} close tag missing", name);
        if let Flow::Stop = structural(section.header_mut(), config, message)? {
            return Ok(false);
        }
    }

    if let Some(position) = rewind_point {
        debug!("<{}> done, rewinding to token {}", name, position);
        lexer.restart_from(position);
    }
    Ok(well_formed)
}

fn next_significant(lexer: &mut Lexer) -> Token {
    loop {
        let token = lexer.next_token();
        if token.kind != TokenKind::Comment {
            return token;
        }
    }
}

/// Top-level loop: dispatch section tags until `</ADL>`
pub(crate) fn read_document(lexer: &mut Lexer, config: &ParserConfig) -> Result<Document, AdlError> {
    let mut document = Document::new();

    let first = next_significant(lexer);
    if !(first.kind == TokenKind::SectionOpen && first.names(ROOT_TAG)) {
        lexer.push_back();
        let message = format!("{} open tag missing At line: {}", ROOT_TAG, first.line);
        if let Flow::Stop = structural(document.root_mut(), config, message)? {
            return Ok(document);
        }
    }
    document.root_mut().open();

    loop {
        let token = lexer.next_token();
        let message = match token.kind {
            TokenKind::Comment => continue,
            TokenKind::EndOfInput => {
                let message = format!("{} close tag missing", ROOT_TAG);
                structural(document.root_mut(), config, message)?;
                break;
            }
            TokenKind::SectionClose if token.names(ROOT_TAG) => {
                document.root_mut().close();
                break;
            }
            TokenKind::SectionOpen => match SectionKind::from_tag(&token.text) {
                Some(kind) => {
                    let mut body = SectionBody::new(kind);
                    let section = body.as_section_mut();
                    section.header_mut().set_tag(&token.text);
                    read_section(section, lexer, config)?;
                    if document.set_section(body).is_none() {
                        continue;
                    }
                    format!(
                        "Duplicate <{}> section replaces the earlier one At line: {}",
                        token.text, token.line
                    )
                }
                None => format!("Unknown section tag <{}> ignored At line: {}", token.text, token.line),
            },
            TokenKind::Keyword => {
                let data = lexer.data_for_keyword();
                let records = document.malformed_mut();
                if records.last().is_none_or(MalformedRecord::is_closed) {
                    records.push(MalformedRecord::new());
                }
                if let Some(record) = records.last_mut() {
                    record.add(&token.text, &data);
                }
                format!(
                    "Unexpected keyword found between document sections.\"{}\" At line: {}",
                    token.text, token.line
                )
            }
            TokenKind::Data => {
                format!(
                    "Unexpected data found between document sections.\"{}\" At line: {}",
                    token.text, token.line
                )
            }
            TokenKind::SectionClose => {
                if let Some(record) = document.malformed_mut().last_mut().filter(|r| !r.is_closed()) {
                    record.set_likely_section(&token.text);
                }
                format!("Found close tag for unopened {} section tag At line: {}", token.text, token.line)
            }
        };

        if let Flow::Stop = structural(document.root_mut(), config, message)? {
            break;
        }
    }

    Ok(document)
}
