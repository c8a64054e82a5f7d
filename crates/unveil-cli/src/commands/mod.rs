pub mod config;
pub mod intro;
pub mod preview;
pub mod resolve;
pub mod simulate;
pub mod stagger;
