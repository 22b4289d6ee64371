//! Shared helpers for tikrelay-proxy integration tests.

// Each test binary uses a different subset of the helpers
#![allow(dead_code)]

pub mod fakes;
pub mod stubs;

/// A URL every validator pattern set accepts.
pub const TIKTOK_URL: &str = "https://www.tiktok.com/@user/video/1234567890123456789";

/// Direct media URL handed out by fake resolvers.
pub const MEDIA_URL: &str = "https://cdn.example/video.mp4";
