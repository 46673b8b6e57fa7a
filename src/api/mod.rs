pub mod gateway;
pub mod http;

pub use gateway::QuizApi;
pub use http::HttpQuizApi;

#[cfg(test)]
pub use gateway::MockQuizApi;
