mod error;
mod middleware;

pub use error::AppError;
pub use middleware::AuthenticatedUser;
