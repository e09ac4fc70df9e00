pub mod column;
pub mod edits;
pub mod events;
pub mod grid;
pub mod history;
pub mod layout;
pub mod mapping;
pub mod rows;
pub mod value;

#[cfg(test)]
mod scenarios;

pub use grid::GridEngine;
