mod driver;
mod executor;
