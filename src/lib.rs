pub mod cli;
pub mod color;
pub mod error;
pub mod layout;
pub mod model;
pub mod parsers;
pub mod plot;
pub mod render;
pub mod tree;
