//! Runtime units for chemeng.
//!
//! Relation inputs arrive as strings such as `"14.6959 psi"` or
//! `"62.423 lb/ft**3"`, so the dimension of a value is only known at runtime.
//! This crate parses those strings into a [`Quantity`] carrying a
//! [`Dimension`] vector and an SI scale, and converts between compatible
//! units. Scale factors for every unit token come from `uom`'s unit
//! definitions, so the numbers match what `uom` itself would compute.
//!
//! # Grammar
//!
//! ```text
//! quantity := number [ whitespace unit ]
//! unit     := [ "/" ] factor { ( "*" | "/" ) factor }
//! factor   := token [ ( "^" | "**" ) [ "-" ] integer ]
//! ```
//!
//! Unit tokens are case-sensitive; see [`table::symbols`] for the full list.
//!
//! # Example
//!
//! ```
//! use chemeng_units::Quantity;
//!
//! let density = Quantity::parse("62.423 lb/ft^3").unwrap();
//! let si = density.convert_to("kg/m**3").unwrap();
//! assert!((si.magnitude() - 999.92).abs() < 0.01);
//! ```

mod dimension;
mod error;
mod lexer;
mod quantity;
mod sigfigs;
mod unit;

pub mod table;

pub use dimension::Dimension;
pub use error::{Error, IncompatibleUnits, ParseError};
pub use quantity::Quantity;
pub use sigfigs::{round_to_significant, significant_figures};
pub use unit::Unit;
