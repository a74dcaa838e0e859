//! Runnable modules bundling services and providing a unified configuration

pub mod options;

pub mod gateway;
