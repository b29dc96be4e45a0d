pub mod product;

pub use product::{ProductRepository, ProductStore, SaveOutcome};

#[cfg(test)]
pub use product::MockProductStore;
