//! Error types for the style registry

use crate::source::StyleSourceKind;
use thiserror::Error;

pub type StyleResult<T> = Result<T, StyleError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("Style source not found: {0}")]
    SourceNotFound(String),

    #[error("Style source {id} is a {kind} source and cannot be written directly; fork it first")]
    ImmutableSourceWrite { id: String, kind: StyleSourceKind },

    #[error("Style source name already in use: {0}")]
    DuplicateName(String),

    #[error("Style source id already in use: {0}")]
    DuplicateId(String),

    #[error("Breakpoint not found: {0}")]
    BreakpointNotFound(String),

    #[error("Breakpoint id already in use: {0}")]
    DuplicateBreakpoint(String),

    #[error("The base breakpoint cannot be removed")]
    BaseBreakpointRequired,

    #[error("Invalid style registry data: {0}")]
    InvalidData(String),
}
