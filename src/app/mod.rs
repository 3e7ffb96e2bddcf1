mod config;
pub use self::config::*;

pub mod commands;
pub use commands::*;

use clap::{Arg, Command};

/// Command line: `blogly [--config FILE] [serve|init-db]`.
pub fn cli() -> Command {
  Command::new("blogly")
    .about("Users, posts and tags, served as HTML.")
    .arg(Arg::new("config")
      .short('c')
      .long("config")
      .value_name("FILE")
      .help("Config file, replaces conf/$RUN_MODE"))
    .subcommand(Command::new("serve")
      .about("Run the web server (default)"))
    .subcommand(Command::new("init-db")
      .about("Create the database schema and exit"))
}
