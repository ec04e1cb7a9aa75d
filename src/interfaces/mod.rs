//! Edges of the application: CSV input and output for the command line.

pub mod csv;
