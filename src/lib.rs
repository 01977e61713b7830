//! Context-window management for LLM conversations
//!
//! Two concerns, stacked:
//!
//! - **Resolution**: turning a raw `(provider, model)` pair into a usable
//!   context-window size, tolerating the decorated and aliased model names
//!   providers actually emit ([`model`]).
//! - **Reduction**: shrinking an over-budget conversation through ordered
//!   tiers of increasingly aggressive strategies until it fits ([`shrink`]).
//!
//! The crate is a pure core: it never talks to the network. Summarization,
//! cancellation, session progress, and prompt construction come in through
//! the trait seams in [`collab`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use shrinkray::{
//!     collab::{PromptBuilder, Summarizer},
//!     Message, ShrinkOptions, ShrinkPipeline,
//!     model::ContextWindowResolver,
//! };
//! # use async_trait::async_trait;
//! # struct MySummarizer;
//! # #[async_trait]
//! # impl Summarizer for MySummarizer {
//! #     async fn summarize(&self, text: &str, _sid: Option<&str>) -> String {
//! #         text.to_string()
//! #     }
//! # }
//! # struct MyPrompts;
//! # impl PromptBuilder for MyPrompts {
//! #     fn build_minimal_system_prompt(&self, _: &[String], _: bool, _: &[String]) -> String {
//! #         "You are a helpful assistant.".to_string()
//! #     }
//! # }
//!
//! # async fn run() -> shrinkray::ContextResult<()> {
//! let pipeline = ShrinkPipeline::new(
//!     Arc::new(ContextWindowResolver::new()),
//!     Arc::new(MySummarizer),
//!     Arc::new(MyPrompts),
//! );
//!
//! let messages = vec![Message::system("..."), Message::user("...")];
//! let result = pipeline
//!     .shrink(ShrinkOptions::new("anthropic", "claude-3.5-sonnet", messages))
//!     .await?;
//! println!("saved {} tokens", result.tokens_saved());
//! # Ok(())
//! # }
//! ```

pub mod collab;
pub mod config;
pub mod error;
pub mod estimator;
pub mod message;
pub mod model;
pub mod observer;
pub mod shrink;

pub use config::ShrinkConfig;
pub use error::{ContextError, ContextResult};
pub use estimator::TokenEstimator;
pub use message::{Message, MessageRole};
pub use model::ContextWindowResolver;
pub use observer::{ContextObserver, NoopObserver};
pub use shrink::{ShrinkOptions, ShrinkPipeline, ShrinkResult, ShrinkStrategy};
