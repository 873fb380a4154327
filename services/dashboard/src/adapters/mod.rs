pub mod http;

pub use http::HttpAdminApi;
