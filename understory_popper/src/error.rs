// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Only parsing and construction can fail. Layout passes never return errors;
//! they degrade to best-effort geometry and log configuration problems instead.

/// A placement string could not be parsed.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ParsePlacementError {
    /// The base side is not one of `top`, `right`, `bottom`, `left` (or `auto`).
    #[error("unknown placement side `{0}`")]
    UnknownSide(String),
    /// The suffix after `-` is not `start` or `end`.
    #[error("unknown placement variation `{0}`")]
    UnknownVariation(String),
}

/// An offset expression could not be parsed.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseOffsetError {
    /// The expression has no terms.
    #[error("empty offset expression")]
    Empty,
    /// More than two axis groups were given.
    #[error("offset expression has {0} axis groups, expected at most 2")]
    TooManyAxes(usize),
    /// A term is not a number with an optional unit.
    #[error("invalid offset term `{0}`")]
    InvalidTerm(String),
    /// A term uses an unsupported unit.
    #[error("unsupported offset unit `{0}`")]
    UnknownUnit(String),
}

/// A popper instance could not be created.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum CreateError {
    /// The host does not recognize the reference element.
    #[error("reference element is not a valid element of the host")]
    InvalidReference,
    /// The host does not recognize the popper element.
    #[error("popper element is not a valid element of the host")]
    InvalidPopper,
    /// The reference and the popper are the same element.
    #[error("reference and popper must be distinct elements")]
    SameElement,
}
