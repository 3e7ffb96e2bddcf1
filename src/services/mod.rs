use log::*;

use std::collections::HashSet;

use actix_files::Files;
use actix_web::web;

use crate::error::*;
use crate::app::*;
use crate::db::DbService;
use crate::views::Views;

mod user;
mod post;
mod tag;

type BoxService = Box<dyn Service>;

/// A group of page handlers that can be switched on from config.
pub trait Service: ServiceClone + Send {
  /// Setup Service endpoints.
  fn web_config(&self, web: &mut web::ServiceConfig);
}

pub trait ServiceClone {
  fn clone_box(&self) -> BoxService;
}

impl<T> ServiceClone for T
where
    T: 'static + Service + Clone,
{
  fn clone_box(&self) -> BoxService {
    Box::new(self.clone())
  }
}

impl Clone for BoxService {
  fn clone(&self) -> BoxService {
    self.clone_box()
  }
}

#[derive(Clone)]
pub struct Services {
  db_url: String,
  views: web::Data<Views>,
  static_dir: Option<String>,
  services: Vec<BoxService>,
}

impl Services {
  fn load_service(name: &str) -> Result<BoxService> {
    let service: BoxService = match name {
      "User" => Box::new(user::new_factory()),
      "Post" => Box::new(post::new_factory()),
      "Tag" => Box::new(tag::new_factory()),
      _ => {
        return Err(anyhow::anyhow!("Unknown Service: {}", name).into());
      },
    };
    Ok(service)
  }

  /// Load services from AppConfig.
  pub fn load_app_config(config: &AppConfig) -> Result<Services> {
    // DB config
    let db_url = config.require_str("db.url")?;

    let template_dir = config.require_str("web.templates")?;
    info!("Loading templates from {}", template_dir);
    let views = web::Data::new(Views::new(&template_dir)?);

    let static_dir = config.get_str("web.static_dir")?
      .filter(|dir| !dir.is_empty());

    let mut loaded = HashSet::new();
    let mut services = Vec::new();
    let list = config.get_array("web.services")?.unwrap_or_default();
    for name in list.iter() {
      info!("Loading {}Service", name);
      // check if it is loaded already.
      if !loaded.insert(name.clone()) {
        return Err(anyhow::anyhow!("can't load service {} multiple times.", name).into());
      }
      services.push(Self::load_service(name)?);
    }

    Ok(Services {
      db_url,
      views,
      static_dir,
      services,
    })
  }

  /// Setup Service endpoints.
  pub fn web_config(&self, web: &mut web::ServiceConfig) {
    // Create DbService for worker.
    let db = DbService::new(&self.db_url);
    web
      .app_data(web::Data::new(db))
      .app_data(self.views.clone())
      .app_data(web::FormConfig::default().limit(256 * 1024));

    for service in self.services.iter() {
      service.web_config(web);
    }

    if let Some(ref dir) = self.static_dir {
      web.service(Files::new("/static", dir));
    }
  }
}

pub fn config_services(config: &AppConfig) -> Result<Services> {
  Services::load_app_config(config)
}
