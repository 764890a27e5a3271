//! grsai wire types. The schemas belong to the provider; these structs only
//! cover the fields the tools read or write.

pub mod chat;
pub mod draw;

pub const CHAT_PATH: &str = "/v1/chat/completions";
pub const IMAGE_PATH: &str = "/v1/draw/nano-banana";
pub const VIDEO_PATH: &str = "/v1/video/veo";
pub const RESULT_PATH: &str = "/v1/draw/result";

/// Disables the provider's webhook callback; results are polled instead.
pub const NO_WEBHOOK: &str = "-1";
