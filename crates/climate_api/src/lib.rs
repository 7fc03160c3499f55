mod app_error;
mod db;
pub mod routes;
mod startup;
mod utils;

pub use app_error::AppError;
pub use db::*;
pub use routes::*;
pub use startup::*;
pub use utils::*;
