// Portfolio editing: the operations behind every builder action, plus the
// HTTP handlers that load a workspace, apply one of them, and persist.

pub mod editing;
pub mod handlers;
pub mod image;
pub mod suggestions;
pub mod transfer;
pub mod validation;
