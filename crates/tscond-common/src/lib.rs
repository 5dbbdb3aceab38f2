//! Common types and utilities for the tscond condition analyzer.
//!
//! This crate provides foundational types used across all tscond crates:
//! - Source spans (`Span`) and line/column positions (`Position`)
//! - Operators shared by the IR, the syntax model and the type algebra
//! - Analysis limits and thresholds
//! - Diagnostic categories, messages and the `Diagnostic` record

// Common types - Shared operator enums to break circular dependencies
pub mod common;
pub use common::ComparisonOperator;

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Position types for line/column source locations
pub mod position;
pub use position::Position;

// Centralized limits and thresholds
pub mod limits;

// Diagnostic categories and rendering
pub mod diagnostics;
pub use diagnostics::{ConditionCategory, Diagnostic, Fix};
