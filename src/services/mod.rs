pub mod environment;
pub mod session;
pub mod settings;
pub mod urls;
