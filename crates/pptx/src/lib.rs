//! PPTX (Office Open XML) output for generated decks.
//!
//! [`SlideAssembler`] lays content out on the fixed template, [`PackageWriter`]
//! turns the resulting [`Deck`] into a `.pptx` package and [`DeckReader`]
//! reads one back.

pub mod assembler;
pub mod deck;
pub mod reader;
pub mod template;
pub mod writer;

pub use assembler::SlideAssembler;
pub use deck::{Alignment, Deck, Picture, RenderedSlide, TextBox};
pub use reader::{DeckReader, ExtractedSlide};
pub use writer::PackageWriter;
