pub mod adopt;

pub use adopt::AdoptCommand;
