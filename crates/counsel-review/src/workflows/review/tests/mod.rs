mod board;
mod common;
mod errors;
