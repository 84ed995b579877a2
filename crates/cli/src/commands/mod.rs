//! CLI subcommands.

pub mod db;
