//! On-the-fly compilation with a content-addressed output cache.
//!
//! [`Compiler`] turns source text into output text through a
//! [`Translator`], skipping the translator whenever the disk cache already
//! holds output for identical content. [`register`] wires a compiler up
//! from the project config and hands back a [`RequireHook`] for the host
//! loader to call. [`WatcherHelpers`] exposes the eviction primitives a
//! caller-owned file watcher needs.

#![warn(missing_docs)]

pub mod compiler;
pub mod error;
pub mod hook;
pub mod transform;
pub mod translator;
pub mod watcher;

pub use compiler::{patch_options, Compiler};
pub use error::{CompilerError, RegisterError, TransformError};
pub use hook::{register, Collaborators, RequireHook, EXTENSIONS};
pub use transform::{TransformResolver, TransformSet, TransformStage};
pub use translator::{TranslateOutput, Translator};
pub use watcher::WatcherHelpers;
