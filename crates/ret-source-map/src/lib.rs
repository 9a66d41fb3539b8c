//! Source mapping for RET documents
//!
//! Analysis works on byte offsets into UTF-8 text, while editors address
//! text by zero-based line and UTF-16 column. This crate provides the two
//! building blocks that connect them:
//! - [`Span`]: a half-open byte range inside a document
//! - [`FileInformation`]: a line/wide-character index for offset ↔ location
//!   conversion
//!
//! # Example
//!
//! ```rust
//! use ret_source_map::*;
//!
//! let info = FileInformation::new("---JSON---\n{}\n");
//! let loc = info.offset_to_location(11).unwrap();
//! assert_eq!((loc.row, loc.column), (1, 0));
//! assert_eq!(info.location_to_offset(1, 0), Some(11));
//! ```

pub mod file_info;
pub mod types;

pub use file_info::FileInformation;
pub use types::{Location, Span};
