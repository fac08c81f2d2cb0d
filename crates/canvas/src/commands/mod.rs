pub mod export;
pub mod file;
pub mod health;
pub mod project;
pub mod share;
pub mod sync;
