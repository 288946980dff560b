//! The governance rule catalog, one module per priority tier.

pub mod compat;
pub mod hygiene;
pub mod style;
pub mod syntax;

pub use compat::{FilterInMustacheExpr, M118Usage, NonAscii};
pub use hygiene::{RespondSemicolon, RespondSquareBrackets, SaveConfigBelowMarker};
pub use style::FilterSpacing;
pub use syntax::{
    DoubleMustacheForbidden, FlowControlKeywords, InlineControlBlocks, PipeInSingleBrace,
};
