pub mod config;
pub mod knowledge;
pub mod models;
pub mod normalize;
pub mod remote;
pub mod resolver;
pub mod server;
pub mod suggest;

pub use config::AppConfig;
pub use resolver::AnswerResolver;
pub use server::run_server;
