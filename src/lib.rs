pub mod alias;
pub mod alpha_bleed;
pub mod cli;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod icon;
pub mod logging;
pub mod matcher;
pub mod menu_class;
pub mod reconcile;
pub mod similarity;
pub mod themes;
