#![allow(dead_code)]

pub mod config;
pub mod mock_gemini;
pub mod server;

/// Small JPEG-shaped data URL used as the source photo
pub const PHOTO: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQ==";
