//! Context assembly and turn orchestration for Textline.
//!
//! The [`ContextAssembler`] decides which stored turns accompany a new user
//! message upstream; the [`TurnOrchestrator`] drives the full exchange:
//! validate → persist user turn → assemble → complete → persist reply.

pub mod context;
pub mod orchestrator;
pub mod token;

pub use context::ContextAssembler;
pub use orchestrator::TurnOrchestrator;
