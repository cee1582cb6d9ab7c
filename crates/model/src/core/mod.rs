pub mod token_id;
