pub(crate) mod auth;
pub(crate) mod classrooms;
pub(crate) mod client;
pub(crate) mod errors;
pub(crate) mod quizzes;
pub(crate) mod resource;

pub(crate) use client::ApiClient;
pub(crate) use errors::{ClientError, ErrorClass};
pub(crate) use resource::Resource;
