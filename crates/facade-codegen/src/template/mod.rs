mod scanner;
mod store;

pub use store::{extract, FragmentKind, TemplateStore};

use crate::Arguments;
use scanner::{tokenize, TokenKind};
use std::{io, path::PathBuf};

/// A defect in a master template. Detected while loading, before anything is generated.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("fragment `{key}` has no delimiters")]
    MissingFragment { key: String },
    #[error("fragment `{key}` has an opening delimiter but no closing one")]
    UnpairedFragment { key: String },
    #[error("fragment `{key}` is delimited {count} times, expected exactly two delimiters")]
    RepeatedFragment { key: String, count: usize },
    #[error("stray delimiter of fragment `{key}` at byte {offset}")]
    StrayFragmentMarker { key: String, offset: usize },
    #[error("master-only span opened at byte {offset} is never closed")]
    UnterminatedRealCode { offset: usize },
    #[error("generated-only span opened at byte {offset} is never closed")]
    UnterminatedGenerated { offset: usize },
    #[error("generated-only span closed at byte {offset} without being opened")]
    UnexpectedGeneratedClose { offset: usize },
    #[error("optional span opened at byte {offset} is never closed")]
    UnpairedOptional { offset: usize },
    #[error("could not read template {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("placeholder `[[{name}]]` has no binding")]
    UnboundPlaceholder { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Placeholder(String),
    /// Either end of an erasable span.
    Optional,
}

/// A template ready for substitution.
///
/// Built from template source by stripping its decoration: master-only spans are dropped,
/// generated-only spans are unwrapped. What remains is literal text, `[[NAME]]`
/// placeholders, and the markers of erasable spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut real_code: Option<usize> = None;
        let mut generated: Option<usize> = None;
        let mut optional: Option<usize> = None;

        for token in tokenize(source) {
            let offset = token.span.start;

            if real_code.is_some() {
                if token.kind == TokenKind::RealCode {
                    real_code = None;
                }

                continue;
            }

            match token.kind {
                TokenKind::Text => push_text(&mut segments, &source[token.span]),
                TokenKind::Placeholder(name) => segments.push(Segment::Placeholder(name.to_string())),
                TokenKind::Fragment(key) => {
                    return Err(TemplateError::StrayFragmentMarker {
                        key: key.to_string(),
                        offset,
                    })
                }
                TokenKind::RealCode => real_code = Some(offset),
                TokenKind::GeneratedOpen => match generated {
                    Some(opened) => return Err(TemplateError::UnterminatedGenerated { offset: opened }),
                    None => generated = Some(offset),
                },
                TokenKind::GeneratedClose => match generated.take() {
                    Some(_) => (),
                    None => return Err(TemplateError::UnexpectedGeneratedClose { offset }),
                },
                TokenKind::Optional => {
                    optional = match optional {
                        Some(_) => None,
                        None => Some(offset),
                    };

                    segments.push(Segment::Optional);
                }
            }
        }

        if let Some(offset) = real_code {
            return Err(TemplateError::UnterminatedRealCode { offset });
        }

        if let Some(offset) = generated {
            return Err(TemplateError::UnterminatedGenerated { offset });
        }

        if let Some(offset) = optional {
            return Err(TemplateError::UnpairedOptional { offset });
        }

        Ok(Self { segments })
    }

    /// Replaces every placeholder with its bound value. A binding to `None` renders as
    /// nothing. Markers of erasable spans that were not erased render as nothing too.
    pub fn format(&self, arguments: &Arguments) -> Result<String, FormatError> {
        let mut output = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => output.push_str(text),
                Segment::Placeholder(name) => match arguments.get(name) {
                    Some(value) => output.push_str(value.unwrap_or_default()),
                    None => return Err(FormatError::UnboundPlaceholder { name: name.clone() }),
                },
                Segment::Optional => (),
            }
        }

        Ok(output)
    }

    /// Resolves the erasable spans. With `keep` only their markers go, otherwise the
    /// markers and everything between them.
    #[must_use]
    pub fn erase(&self, keep: bool) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len());
        let mut inside = false;

        for segment in &self.segments {
            match segment {
                Segment::Optional => inside = !inside,
                _ if inside && !keep => (),
                Segment::Text(text) => push_text(&mut segments, text),
                other => segments.push(other.clone()),
            }
        }

        Self { segments }
    }

    /// Placeholder names, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn has_optional_spans(&self) -> bool {
        self.segments.contains(&Segment::Optional)
    }
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    match segments.last_mut() {
        Some(Segment::Text(last)) => last.push_str(text),
        _ => segments.push(Segment::Text(text.to_string())),
    }
}
