//! The BRX request pipeline.
//!
//! A request flows through five stages:
//!
//! 1. **Lexical analysis**: token and sentence counts, intent tags, tone,
//!    specificity
//! 2. **Context enrichment**: domains, implicit requirements, history
//! 3. **Tool strategy**: ordered tool plan from keyword families
//! 4. **Quality planning**: threshold, iteration cap, criteria
//! 5. **Execution**: a best-of-N convergence loop over the tool plan
//!
//! Every stage appends one record to a request-scoped trace. The analysis is
//! a deterministic keyword heuristic over surface text features.
//!
//! [`Runtime`] ties the pipeline to the shared tool registry, version ledger
//! and submission intake.

pub mod convergence;
pub mod enrichment;
pub mod invoker;
pub mod keywords;
pub mod lexical;
pub mod pipeline;
pub mod quality;
pub mod runtime;
pub mod strategy;
pub mod trace;

pub use convergence::{ConvergenceLoop, IterationRecord, PipelineOutcome, evaluate_quality};
pub use enrichment::ContextInsights;
pub use invoker::{
    ExecutionResult, RegistryInvoker, SimulatedInvoker, ToolInvoker, ToolOutcome, ToolRunEntry,
};
pub use keywords::{Intent, KeywordFamily, KnowledgeDomain, PrimaryDomain, Requirement, Tone};
pub use lexical::LexicalFeatures;
pub use pipeline::{ThinkingPipeline, ThinkingResult};
pub use quality::{Criterion, QualityPolicy, RefinementStrategy};
pub use runtime::{QualityMetrics, RequestReport, Runtime, SystemInfo, SystemStatus};
pub use strategy::{IntegrationStrategy, ToolPlan};
pub use trace::{Stage, StageRecord, StageTrace};
