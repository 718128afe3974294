#[macro_use]
extern crate log;

pub mod assets;
pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod shaping;
pub mod text;

pub use compose::CardComposer;
pub use config::{CardLayout, Config, HeaderSchema, SheetConfig};
pub use error::{BadgeError, Result};
pub use record::{Record, RunDefaults};
pub use text::{GlyphRenderer, Typeface};
