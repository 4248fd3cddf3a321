mod cli;
mod laws;
