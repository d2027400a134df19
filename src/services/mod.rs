pub mod pipeline;

pub use pipeline::CompletionPipeline;
