//! Chatbot Dialogue - phase-based questionnaire bot
//!
//! Drives users of Telegram and WhatsApp through a scripted interview:
//! language choice, presentation, numbered questions, recorded audio
//! answers and a conclusion. The script lives in a YAML dialogue document.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
