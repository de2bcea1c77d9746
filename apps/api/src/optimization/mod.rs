// Document optimization: prompt composition, the pipeline that runs it,
// and the HTTP handlers in front of the workspace.

pub mod composer;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
