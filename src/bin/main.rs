use dotenv::dotenv;

use blogly::{app::*, error::*};

fn main() -> Result<()> {
  dotenv().ok();
  env_logger::init();

  let cli = cli().get_matches();

  let config = AppConfig::new_clap(&cli)?;

  match cli.subcommand_name() {
    Some("init-db") => init_db::execute(config)?,
    // default to 'serve' command.
    _ => serve::execute(config)?,
  }
  log::info!("Main finished");
  Ok(())
}
