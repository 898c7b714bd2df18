pub mod aggregate;
pub mod etl;
pub mod geodesy;

pub use crate::domain::model::{LaunchRecord, LaunchReport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
