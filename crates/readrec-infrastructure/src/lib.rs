pub mod catalog_service;
pub mod paths;
pub mod secret_service;
pub mod storage;

pub use crate::catalog_service::CatalogService;
pub use crate::secret_service::{GEMINI_API_KEY_ENV, SecretServiceImpl};
