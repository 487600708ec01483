mod engine;
mod errors;
