//! Zoom API client and chat message schema
//!
//! Everything that talks to the Zoom REST API on the caller's behalf:
//! recipient lookup by email and rich-content chat posting through the
//! chatbot endpoint.

pub mod client;
pub mod message;

pub use client::{ZoomClient, ZoomError, ZoomUser};
pub use message::{
    Action, AlertLevel, BodyBlock, ChatMessage, Field, Footer, Head, MessageContent, Style, SubHead,
};
