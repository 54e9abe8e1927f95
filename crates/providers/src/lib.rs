//! # Coscientist Providers
//!
//! Collaborator capabilities the cycle engine depends on, each behind an
//! async trait so backends can be swapped without touching stage logic:
//!
//! - [`TextGenerator`]: produces text for a prompt ([`OpenRouterClient`]
//!   over HTTP, [`ScriptedGenerator`] for offline runs and tests);
//! - [`PairwiseJudge`]: picks the better of two hypotheses ([`LlmJudge`]
//!   on top of any generator, [`ScriptedJudge`] for tests);
//! - [`Embedder`]: deterministic text vectors ([`HashEmbedder`]);
//! - [`LiteratureResolver`]: paper metadata lookup ([`StaticResolver`]);
//! - [`SessionSink`]: external persistence mirror ([`NullSink`],
//!   [`RecordingSink`]).
//!
//! Transient failures are retried with exponential backoff inside the
//! implementations ([`with_retry`]); configuration errors fail fast.

mod embedder;
mod error;
mod judge;
mod openrouter;
mod resolver;
mod retry;
mod scripted;
mod sink;
mod traits;

pub use embedder::HashEmbedder;
pub use error::{ProviderError, Result};
pub use judge::LlmJudge;
pub use openrouter::{OpenRouterClient, OPENROUTER_BASE_URL};
pub use resolver::StaticResolver;
pub use retry::{with_retry, RetryPolicy};
pub use scripted::{ScriptedGenerator, ScriptedJudge};
pub use sink::{NullSink, RecordingSink, SessionSink, SinkEvent};
pub use traits::{Contender, Embedder, LiteratureResolver, PairwiseJudge, TextGenerator, Verdict};
