//! Gemini API integration for snowman analysis.
//!
//! Two unary calls per capture, both against `generateContent`:
//!
//! 1. **Analysis** - the photo plus a fixed Korean instruction, with the
//!    output forced into a JSON schema (name, description, type, rarity,
//!    five stats, fun fact).
//! 2. **Sticker** - the same photo with a style directive, returning an
//!    inline 1:1 image.
//!
//! [`SnowmanGateway`] is the seam the collection manager depends on, so tests
//! can substitute a scripted implementation for [`GeminiClient`].

mod client;
mod error;
pub mod prompt;
pub mod types;

use std::future::Future;
use std::sync::Arc;

use snowdex_core::{AnalysisResult, ImageData};

pub use client::GeminiClient;
pub use error::{ApiError, ApiErrorResponse, GeminiError};

/// Remote image understanding and generation.
pub trait SnowmanGateway: Send + Sync {
    /// Describe the snowman in `image` as a structured analysis.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, API errors, an empty response, or a payload
    /// that does not match the analysis schema.
    fn analyze(
        &self,
        image: &ImageData,
    ) -> impl Future<Output = Result<AnalysisResult, GeminiError>> + Send;

    /// Produce a stylized sticker of the snowman in `image`.
    ///
    /// `Ok(None)` means the model answered without an image.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, API errors, or an undecodable image part.
    fn generate_sticker(
        &self,
        image: &ImageData,
    ) -> impl Future<Output = Result<Option<ImageData>, GeminiError>> + Send;
}

impl<G: SnowmanGateway> SnowmanGateway for Arc<G> {
    fn analyze(
        &self,
        image: &ImageData,
    ) -> impl Future<Output = Result<AnalysisResult, GeminiError>> + Send {
        (**self).analyze(image)
    }

    fn generate_sticker(
        &self,
        image: &ImageData,
    ) -> impl Future<Output = Result<Option<ImageData>, GeminiError>> + Send {
        (**self).generate_sticker(image)
    }
}
