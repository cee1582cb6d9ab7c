pub mod chain;
pub mod error;
pub mod indexer;

#[cfg(test)]
mod test_support;
