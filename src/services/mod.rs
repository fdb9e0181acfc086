pub mod page_service;
pub mod index_service;

pub use page_service::PageService;
pub use index_service::IndexService;
